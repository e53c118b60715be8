pub use containers::{Container, ContainerFields};
pub use error::{EngineError, ErrorKind};
pub use essences::{Essence, EssenceFields, Gender};
pub use history::{OrphanedProduct, ProductStatus, SaleHistoryRow};
pub use money::SaleCosts;
pub use ops::{Engine, EngineBuilder, SaleRequest};
pub use products::{Product, ProductKind};
pub use reports::{GenderStatistics, InventoryValuation, KindValuation, SalesStatistics};
pub use sales::Sale;

pub mod containers;
mod error;
pub mod essences;
mod history;
pub mod money;
mod ops;
mod products;
mod reports;
pub mod sales;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
