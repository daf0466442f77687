// Wire-level object types shared by orgplane services.
//
// Everything here is a pure mapping between request/response payloads and the
// backend query model. No function in this crate performs I/O or fails; invalid
// input surfaces as an explicit sentinel value that callers must check.
pub mod details;
pub mod query;

pub use details::{
    Details, ListDetails, ObjectDetails, SearchResponse, change_details_from_domain,
    details_from_domain, to_list_details, view_details,
};
pub use query::{
    ListQuery, TextComparison, TextFilter, TextMethod, TextQueryMethod, list_query_to_query,
    text_method_to_query,
};
