use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::category::Entity as CategoryEntity;
use crate::entities::product::{self, Entity as ProductEntity};
use crate::entities::sale::{self, Entity as SaleEntity, PaymentMethod};
use crate::entities::sale_item::{self, Entity as SaleItemEntity};
use crate::errors::ServiceError;

/// Read-only aggregation service behind the sales dashboard.
///
/// All date bucketing happens here in the application, against explicit
/// UTC bounds derived from the configured business-day offset. The store's
/// "today" therefore never depends on the database server's time zone.
#[derive(Clone)]
pub struct DashboardService {
    db: Arc<DatabaseConnection>,
    business_day_offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentTotal {
    pub payment_method: PaymentMethod,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TodaySummary {
    pub date: NaiveDate,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
    pub by_payment_method: Vec<PaymentTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: Uuid,
    pub name: String,
    pub quantity_sold: i64,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySales {
    pub category_id: Option<Uuid>,
    pub name: String,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    /// Share of the window's revenue, rounded to two decimals
    pub percentage: Decimal,
}

/// Totals for one reporting window, compared against the window before it
#[derive(Debug, Clone, Serialize)]
pub struct WindowStats {
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
    /// Revenue minus current catalog cost of the units sold
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub profit: Decimal,
    /// Percent change of revenue vs the prior window; None when the prior
    /// window had no sales
    pub change_pct: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub today: WindowStats,
    pub week: WindowStats,
    pub month: WindowStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlySales {
    pub hour: u32,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentShare {
    pub payment_method: PaymentMethod,
    #[serde(serialize_with = "crate::entities::money::serialize")]
    pub total: Decimal,
    pub count: u64,
    /// Share of the window's revenue, rounded to two decimals
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowStockAlert {
    pub product_id: Uuid,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub today: TodaySummary,
    pub sales_by_day: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
    pub sales_by_category: Vec<CategorySales>,
    pub low_stock_count: u64,
    pub recent_sales: Vec<sale::Model>,
}

/// The business date a timestamp falls on, given the shop's offset from
/// UTC midnight. A +120 offset means the day rolls over at 22:00 UTC.
pub fn business_date(at: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    (at + Duration::minutes(offset_minutes as i64)).date_naive()
}

/// Half-open UTC interval [start, end) covering one business date
pub fn day_bounds(date: NaiveDate, offset_minutes: i32) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let start = Utc.from_utc_datetime(&midnight) - Duration::minutes(offset_minutes as i64);
    (start, start + Duration::days(1))
}

/// Revenue change between two windows, as a rounded percentage. A window
/// with no prior revenue has no meaningful baseline.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        None
    } else {
        Some(((current - previous) / previous * Decimal::from(100)).round_dp(2))
    }
}

/// First business date of the calendar week (Monday) containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First business date of the calendar month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl DashboardService {
    pub fn new(db: Arc<DatabaseConnection>, business_day_offset_minutes: i32) -> Self {
        Self {
            db,
            business_day_offset_minutes,
        }
    }

    fn today(&self) -> NaiveDate {
        business_date(Utc::now(), self.business_day_offset_minutes)
    }

    /// Totals for the current business day
    #[instrument(skip(self))]
    pub async fn today_summary(&self) -> Result<TodaySummary, ServiceError> {
        let date = self.today();
        let (start, end) = day_bounds(date, self.business_day_offset_minutes);

        let sales = self.sales_between(start, end).await?;

        let total = sales.iter().map(|s| s.total).sum();
        let count = sales.len() as u64;

        let mut by_method: BTreeMap<String, (PaymentMethod, Decimal, u64)> = BTreeMap::new();
        for s in &sales {
            let entry = by_method
                .entry(s.payment_method.to_string())
                .or_insert((s.payment_method, Decimal::ZERO, 0));
            entry.1 += s.total;
            entry.2 += 1;
        }

        let by_payment_method = by_method
            .into_values()
            .map(|(payment_method, total, count)| PaymentTotal {
                payment_method,
                total,
                count,
            })
            .collect();

        Ok(TodaySummary {
            date,
            total,
            count,
            by_payment_method,
        })
    }

    /// Day, week-to-date and month-to-date revenue with profit, each
    /// compared against the full prior calendar period
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<PeriodSummary, ServiceError> {
        let offset = self.business_day_offset_minutes;
        let today = self.today();

        let (day_start, day_end) = day_bounds(today, offset);
        let (prev_day_start, _) = day_bounds(today - Duration::days(1), offset);

        let week = week_start(today);
        let (week_start_at, _) = day_bounds(week, offset);
        let (prev_week_start, _) = day_bounds(week - Duration::days(7), offset);

        let month = month_start(today);
        let (month_start_at, _) = day_bounds(month, offset);
        let (prev_month_start, _) = day_bounds(month_start(month - Duration::days(1)), offset);

        let today_stats = self
            .window_stats(day_start, day_end, prev_day_start, day_start)
            .await?;
        let week_stats = self
            .window_stats(week_start_at, day_end, prev_week_start, week_start_at)
            .await?;
        let month_stats = self
            .window_stats(month_start_at, day_end, prev_month_start, month_start_at)
            .await?;

        Ok(PeriodSummary {
            today: today_stats,
            week: week_stats,
            month: month_stats,
        })
    }

    /// 24 zero-filled buckets of sales for one business date
    #[instrument(skip(self))]
    pub async fn hourly_sales(&self, date: NaiveDate) -> Result<Vec<HourlySales>, ServiceError> {
        let offset = self.business_day_offset_minutes;
        let (start, end) = day_bounds(date, offset);

        let sales = self.sales_between(start, end).await?;

        let mut buckets: Vec<(Decimal, u64)> = vec![(Decimal::ZERO, 0); 24];
        for s in sales {
            let local = s.created_at + Duration::minutes(offset as i64);
            let hour = local.time().hour() as usize;
            buckets[hour].0 += s.total;
            buckets[hour].1 += 1;
        }

        Ok(buckets
            .into_iter()
            .enumerate()
            .map(|(hour, (total, count))| HourlySales {
                hour: hour as u32,
                total,
                count,
            })
            .collect())
    }

    /// How customers paid over the trailing window
    #[instrument(skip(self))]
    pub async fn payment_method_shares(
        &self,
        days: u32,
    ) -> Result<Vec<PaymentShare>, ServiceError> {
        let days = days.max(1);
        let today = self.today();
        let first = today - Duration::days(days as i64 - 1);

        let (start, _) = day_bounds(first, self.business_day_offset_minutes);
        let (_, end) = day_bounds(today, self.business_day_offset_minutes);

        let sales = self.sales_between(start, end).await?;

        let grand_total: Decimal = sales.iter().map(|s| s.total).sum();

        let mut by_method: BTreeMap<String, (PaymentMethod, Decimal, u64)> = BTreeMap::new();
        for s in &sales {
            let entry = by_method
                .entry(s.payment_method.to_string())
                .or_insert((s.payment_method, Decimal::ZERO, 0));
            entry.1 += s.total;
            entry.2 += 1;
        }

        Ok(by_method
            .into_values()
            .map(|(payment_method, total, count)| {
                let percentage = if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    (total / grand_total * Decimal::from(100)).round_dp(2)
                };
                PaymentShare {
                    payment_method,
                    total,
                    count,
                    percentage,
                }
            })
            .collect())
    }

    /// Daily totals for the trailing window ending today. Days without
    /// sales appear with zeros so charts keep a continuous axis.
    #[instrument(skip(self))]
    pub async fn sales_by_day(&self, days: u32) -> Result<Vec<DailySales>, ServiceError> {
        let days = days.max(1);
        let today = self.today();
        let first = today - Duration::days(days as i64 - 1);

        let (start, _) = day_bounds(first, self.business_day_offset_minutes);
        let (_, end) = day_bounds(today, self.business_day_offset_minutes);

        let sales = self.sales_between(start, end).await?;

        let mut buckets: BTreeMap<NaiveDate, (Decimal, u64)> = BTreeMap::new();
        let mut date = first;
        while date <= today {
            buckets.insert(date, (Decimal::ZERO, 0));
            date += Duration::days(1);
        }

        for s in sales {
            let day = business_date(s.created_at, self.business_day_offset_minutes);
            if let Some(entry) = buckets.get_mut(&day) {
                entry.0 += s.total;
                entry.1 += 1;
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(date, (total, count))| DailySales { date, total, count })
            .collect())
    }

    /// Best sellers by units over the trailing window
    #[instrument(skip(self))]
    pub async fn top_products(
        &self,
        days: u32,
        limit: usize,
    ) -> Result<Vec<TopProduct>, ServiceError> {
        let items = self.items_in_window(days).await?;

        let mut by_product: HashMap<Uuid, (i64, Decimal)> = HashMap::new();
        for item in &items {
            let entry = by_product
                .entry(item.product_id)
                .or_insert((0, Decimal::ZERO));
            entry.0 += item.quantity as i64;
            entry.1 += item.subtotal;
        }

        let product_ids: Vec<Uuid> = by_product.keys().copied().collect();
        let products = ProductEntity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?;
        let names: HashMap<Uuid, String> =
            products.into_iter().map(|p| (p.id, p.name)).collect();

        let mut top: Vec<TopProduct> = by_product
            .into_iter()
            .map(|(product_id, (quantity_sold, revenue))| TopProduct {
                product_id,
                name: names
                    .get(&product_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown product".to_string()),
                quantity_sold,
                revenue,
            })
            .collect();

        top.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then_with(|| b.revenue.cmp(&a.revenue))
        });
        top.truncate(limit);

        Ok(top)
    }

    /// Revenue split by category over the trailing window
    #[instrument(skip(self))]
    pub async fn sales_by_category(&self, days: u32) -> Result<Vec<CategorySales>, ServiceError> {
        let items = self.items_in_window(days).await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = ProductEntity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?;
        let product_category: HashMap<Uuid, Option<Uuid>> = products
            .into_iter()
            .map(|p| (p.id, p.category_id))
            .collect();

        let categories = CategoryEntity::find().all(&*self.db).await?;
        let category_names: HashMap<Uuid, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        let mut by_category: HashMap<Option<Uuid>, Decimal> = HashMap::new();
        let mut grand_total = Decimal::ZERO;
        for item in &items {
            let category_id = product_category.get(&item.product_id).copied().flatten();
            *by_category.entry(category_id).or_insert(Decimal::ZERO) += item.subtotal;
            grand_total += item.subtotal;
        }

        let mut split: Vec<CategorySales> = by_category
            .into_iter()
            .map(|(category_id, total)| {
                let percentage = if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    (total / grand_total * Decimal::from(100)).round_dp(2)
                };
                let name = match category_id {
                    Some(id) => category_names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown category".to_string()),
                    None => "Sin categoría".to_string(),
                };
                CategorySales {
                    category_id,
                    name,
                    total,
                    percentage,
                }
            })
            .collect();

        split.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(split)
    }

    /// How many active products sit at or below their minimum stock
    #[instrument(skip(self))]
    pub async fn low_stock_count(&self) -> Result<u64, ServiceError> {
        let count = ProductEntity::find()
            .filter(product::Column::Active.eq(true))
            .filter(
                Expr::col(product::Column::Stock).lte(Expr::col(product::Column::MinStock)),
            )
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    /// Active products at or below their minimum stock, worst first.
    /// Severity is stock relative to the threshold, compared by
    /// cross-multiplication so a zero threshold needs no special case.
    #[instrument(skip(self))]
    pub async fn low_stock_alerts(
        &self,
        limit: usize,
    ) -> Result<Vec<LowStockAlert>, ServiceError> {
        let products = ProductEntity::find()
            .filter(product::Column::Active.eq(true))
            .filter(
                Expr::col(product::Column::Stock).lte(Expr::col(product::Column::MinStock)),
            )
            .all(&*self.db)
            .await?;

        let mut alerts: Vec<LowStockAlert> = products
            .into_iter()
            .map(|p| LowStockAlert {
                product_id: p.id,
                name: p.name,
                stock: p.stock,
                min_stock: p.min_stock,
            })
            .collect();

        alerts.sort_by(|a, b| {
            let lhs = a.stock as i64 * b.min_stock as i64;
            let rhs = b.stock as i64 * a.min_stock as i64;
            lhs.cmp(&rhs).then_with(|| a.name.cmp(&b.name))
        });
        alerts.truncate(limit);

        Ok(alerts)
    }

    /// Most recent sales, newest first
    #[instrument(skip(self))]
    pub async fn recent_sales(&self, limit: u64) -> Result<Vec<sale::Model>, ServiceError> {
        let sales = SaleEntity::find()
            .order_by_desc(sale::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(sales)
    }

    /// Everything the dashboard screen needs in one call
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<DashboardOverview, ServiceError> {
        let today = self.today_summary().await?;
        let sales_by_day = self.sales_by_day(7).await?;
        let top_products = self.top_products(7, 5).await?;
        let sales_by_category = self.sales_by_category(7).await?;
        let low_stock_count = self.low_stock_count().await?;
        let recent_sales = self.recent_sales(5).await?;

        Ok(DashboardOverview {
            today,
            sales_by_day,
            top_products,
            sales_by_category,
            low_stock_count,
            recent_sales,
        })
    }

    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<sale::Model>, ServiceError> {
        let sales = SaleEntity::find()
            .filter(
                Condition::all()
                    .add(sale::Column::CreatedAt.gte(start))
                    .add(sale::Column::CreatedAt.lt(end)),
            )
            .all(&*self.db)
            .await?;
        Ok(sales)
    }

    async fn items_in_window(&self, days: u32) -> Result<Vec<sale_item::Model>, ServiceError> {
        let days = days.max(1);
        let today = self.today();
        let first = today - Duration::days(days as i64 - 1);

        let (start, _) = day_bounds(first, self.business_day_offset_minutes);
        let (_, end) = day_bounds(today, self.business_day_offset_minutes);

        let sales = self.sales_between(start, end).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let sale_ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let items = SaleItemEntity::find()
            .filter(sale_item::Column::SaleId.is_in(sale_ids))
            .all(&*self.db)
            .await?;
        Ok(items)
    }

    async fn window_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        prev_start: DateTime<Utc>,
        prev_end: DateTime<Utc>,
    ) -> Result<WindowStats, ServiceError> {
        let sales = self.sales_between(start, end).await?;
        let total: Decimal = sales.iter().map(|s| s.total).sum();
        let count = sales.len() as u64;
        let profit = self.profit_of(&sales).await?;

        let prev_sales = self.sales_between(prev_start, prev_end).await?;
        let prev_total: Decimal = prev_sales.iter().map(|s| s.total).sum();

        Ok(WindowStats {
            total,
            count,
            profit,
            change_pct: percent_change(total, prev_total),
        })
    }

    /// Margin on a set of sales, against the cost currently on the catalog.
    /// Items whose product has since been deleted contribute their full
    /// subtotal.
    async fn profit_of(&self, sales: &[sale::Model]) -> Result<Decimal, ServiceError> {
        if sales.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let sale_ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let items = SaleItemEntity::find()
            .filter(sale_item::Column::SaleId.is_in(sale_ids))
            .all(&*self.db)
            .await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = ProductEntity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?;
        let costs: HashMap<Uuid, Decimal> =
            products.into_iter().map(|p| (p.id, p.cost)).collect();

        let mut profit = Decimal::ZERO;
        for item in &items {
            let unit_cost = costs.get(&item.product_id).copied().unwrap_or(Decimal::ZERO);
            profit += item.subtotal - unit_cost * Decimal::from(item.quantity);
        }
        Ok(profit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn business_date_with_zero_offset_is_the_utc_date() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 23, 30, 0).unwrap();
        assert_eq!(
            business_date(at, 0),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }

    #[test]
    fn positive_offset_rolls_late_evening_into_next_day() {
        // Shop runs 2 hours ahead of UTC: 23:30 UTC is 01:30 local
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 23, 30, 0).unwrap();
        assert_eq!(
            business_date(at, 120),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
        );
    }

    #[test]
    fn negative_offset_holds_early_morning_in_previous_day() {
        // Shop runs 5 hours behind UTC: 03:00 UTC is 22:00 the previous day
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 3, 0, 0).unwrap();
        assert_eq!(
            business_date(at, -300),
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }

    #[test]
    fn day_bounds_are_half_open_and_cover_24_hours() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (start, end) = day_bounds(date, -300);

        assert_eq!(end - start, Duration::days(1));
        assert_eq!(business_date(start, -300), date);
        assert_eq!(business_date(end - Duration::seconds(1), -300), date);
        assert_ne!(business_date(end, -300), date);
    }

    #[test]
    fn percent_change_against_a_real_baseline() {
        use rust_decimal_macros::dec;

        assert_eq!(percent_change(dec!(150), dec!(100)), Some(dec!(50.00)));
        assert_eq!(percent_change(dec!(75), dec!(100)), Some(dec!(-25.00)));
        assert_eq!(percent_change(dec!(100), dec!(100)), Some(dec!(0.00)));
    }

    #[test]
    fn percent_change_has_no_answer_without_a_baseline() {
        use rust_decimal_macros::dec;

        assert_eq!(percent_change(dec!(100), Decimal::ZERO), None);
        assert_eq!(percent_change(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-06-15 is a Saturday
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(week_start(date), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        // A Monday is its own week start
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn month_start_is_the_first() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(month_start(date), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn every_timestamp_lands_inside_its_own_day_bounds() {
        for offset in [-720, -300, 0, 120, 840] {
            let at = Utc.with_ymd_and_hms(2024, 3, 10, 4, 59, 59).unwrap();
            let date = business_date(at, offset);
            let (start, end) = day_bounds(date, offset);
            assert!(start <= at && at < end, "offset {} failed", offset);
        }
    }
}
