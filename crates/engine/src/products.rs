//! A product of either kind, tagged explicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Container, Essence};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Essence,
    Container,
}

impl ProductKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essence => "essence",
            Self::Container => "container",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Product {
    Essence(Essence),
    Container(Container),
}

impl Product {
    pub fn kind(&self) -> ProductKind {
        match self {
            Self::Essence(_) => ProductKind::Essence,
            Self::Container(_) => ProductKind::Container,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Essence(essence) => &essence.id,
            Self::Container(container) => &container.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Essence(essence) => &essence.name,
            Self::Container(container) => &container.name,
        }
    }

    pub fn stock_value(&self) -> Decimal {
        match self {
            Self::Essence(essence) => essence.stock_value(),
            Self::Container(container) => container.stock_value(),
        }
    }

    pub fn is_low_stock(&self) -> bool {
        match self {
            Self::Essence(essence) => essence.is_low_stock(),
            Self::Container(container) => container.is_low_stock(),
        }
    }
}

impl From<Essence> for Product {
    fn from(value: Essence) -> Self {
        Self::Essence(value)
    }
}

impl From<Container> for Product {
    fn from(value: Container) -> Self {
        Self::Container(value)
    }
}
