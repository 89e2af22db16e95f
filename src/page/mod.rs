pub mod accessor;
pub mod chrome;
pub mod mock_page;
pub mod snapshot;

pub use accessor::PageAccessor;
pub use chrome::ChromePage;
pub use mock_page::MockPage;
pub use snapshot::PageSnapshot;
