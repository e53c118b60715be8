use std::collections::HashMap;

use crate::{
    Container, Essence, Gender, GenderStatistics, InventoryValuation, ResultEngine, Sale,
    SalesStatistics,
};

use super::Engine;

impl Engine {
    /// Essences below the low stock threshold, sorted by id.
    pub async fn low_stock_essences(&self) -> ResultEngine<Vec<Essence>> {
        let essences = self.list_essences().await?;
        Ok(essences.into_iter().filter(Essence::is_low_stock).collect())
    }

    /// Containers below the low stock threshold, sorted by id.
    pub async fn low_stock_containers(&self) -> ResultEngine<Vec<Container>> {
        let containers = self.list_containers().await?;
        Ok(containers
            .into_iter()
            .filter(Container::is_low_stock)
            .collect())
    }

    pub async fn inventory_valuation(&self) -> ResultEngine<InventoryValuation> {
        let mut valuation = InventoryValuation::default();
        for essence in self.list_essences().await? {
            valuation
                .essences
                .add(essence.stock_value(), essence.is_low_stock());
        }
        for container in self.list_containers().await? {
            valuation
                .containers
                .add(container.stock_value(), container.is_low_stock());
        }
        valuation.total_value = valuation.essences.stock_value + valuation.containers.stock_value;
        Ok(valuation)
    }

    /// Totals over the whole ledger, including sales of deleted products.
    pub async fn sales_statistics(&self) -> ResultEngine<SalesStatistics> {
        let sales = self.list_sales().await?;
        Ok(SalesStatistics::from_sales(&sales))
    }

    /// One row per gender tag, in the fixed order of [`Gender::ALL`].
    ///
    /// A sale counts for the tag stored with it, or for the current tag of
    /// its essence when it has none. Sales of deleted essences without a
    /// stored tag are left out. Containers carry no tag and never count.
    pub async fn stats_by_gender(&self) -> ResultEngine<Vec<GenderStatistics>> {
        let essences = self.list_essences().await?;
        let sales = self.list_sales().await?;

        let current: HashMap<&str, Gender> = essences
            .iter()
            .map(|essence| (essence.id.as_str(), essence.gender))
            .collect();
        let sale_gender = |sale: &Sale| {
            sale.gender
                .or_else(|| current.get(sale.product_id.as_str()).copied())
        };

        Ok(Gender::ALL
            .iter()
            .map(|&gender| {
                let tagged = essences.iter().filter(|essence| essence.gender == gender);
                let sold = SalesStatistics::from_sales(
                    sales.iter().filter(|sale| sale_gender(*sale) == Some(gender)),
                );
                GenderStatistics {
                    gender,
                    essences: tagged.clone().count() as u64,
                    stock_ml: tagged.clone().map(|essence| essence.stock_ml).sum(),
                    stock_value: tagged.map(Essence::stock_value).sum(),
                    sales: sold,
                }
            })
            .collect())
    }
}
