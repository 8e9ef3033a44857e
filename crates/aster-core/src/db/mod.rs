mod filter;
mod query;
mod store;
mod value;

pub use filter::{CompareOp, Filter};
pub use query::{quote_ident, QueryBuilder, SqlQuery};
pub use store::DataStore;
pub use value::{Row, Value};
