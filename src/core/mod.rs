pub mod card_record;
pub mod search_response;

pub use card_record::{CardImage, CardRecord};
pub use search_response::{PageProgress, SearchError, SearchResponse, SearchSource, SearchState};
