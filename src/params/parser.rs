use super::{operation, order, pagination, select};
use super::operation::Operation;
use super::order::SortOrder;
use crate::clock::{Clock, SystemClock};
use crate::error::CatalogError;
use crate::query::QuerySpecification;
use crate::schema::{Catalog, Constraint, Field};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::cell::OnceCell;

/// Turns one request's raw parameters into a [`QuerySpecification`] for a
/// block.
///
/// The block's fields and constraints, and today's date, are captured when
/// the parser is built. Each accessor is computed on first use and cached;
/// invalid input never fails an accessor, it is left out of the result.
#[derive(Debug)]
pub struct ParamParser {
    block: String,
    measures: Vec<Field>,
    dimensions: Vec<Field>,
    constraints: Vec<Constraint>,
    params: Map<String, Value>,
    today: NaiveDate,

    selected_measures: OnceCell<Vec<Field>>,
    selected_dimensions: OnceCell<Vec<Field>>,
    orders: OnceCell<Vec<SortOrder>>,
    limit: OnceCell<u64>,
    offset: OnceCell<u64>,
    operations: OnceCell<Vec<Operation>>,
}

impl ParamParser {
    pub fn new(
        catalog: &impl Catalog,
        block: &str,
        params: Map<String, Value>,
    ) -> Result<Self, CatalogError> {
        Self::with_clock(catalog, block, params, &SystemClock)
    }

    pub fn with_clock(
        catalog: &impl Catalog,
        block: &str,
        params: Map<String, Value>,
        clock: &impl Clock,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            block: block.to_owned(),
            measures: catalog.measures(block)?,
            dimensions: catalog.dimensions(block)?,
            constraints: catalog.constraints(block)?,
            params,
            today: clock.today(),
            selected_measures: OnceCell::new(),
            selected_dimensions: OnceCell::new(),
            orders: OnceCell::new(),
            limit: OnceCell::new(),
            offset: OnceCell::new(),
            operations: OnceCell::new(),
        })
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Measures named by `select`, or every measure.
    pub fn measures(&self) -> &[Field] {
        self.selected_measures
            .get_or_init(|| select::select_fields(self.params.get("select"), &self.measures))
    }

    /// Dimensions named by `by`, or every dimension.
    pub fn dimensions(&self) -> &[Field] {
        self.selected_dimensions
            .get_or_init(|| select::select_fields(self.params.get("by"), &self.dimensions))
    }

    pub fn orders(&self) -> &[SortOrder] {
        self.orders.get_or_init(|| {
            order::parse_orders(self.params.get("order"), &self.measures, &self.dimensions)
        })
    }

    pub fn limit(&self) -> u64 {
        *self
            .limit
            .get_or_init(|| pagination::resolve_limit(&self.params))
    }

    pub fn offset(&self) -> u64 {
        *self
            .offset
            .get_or_init(|| pagination::resolve_offset(&self.params))
    }

    pub fn operations(&self) -> &[Operation] {
        self.operations.get_or_init(|| {
            operation::parse_operations(self.params.get("where"), &self.constraints, self.today)
        })
    }

    pub fn to_spec(&self) -> QuerySpecification {
        QuerySpecification {
            measures: self.measures().to_vec(),
            dimensions: self.dimensions().to_vec(),
            operations: self.operations().to_vec(),
            orders: self.orders().to_vec(),
            limit: self.limit(),
            offset: self.offset(),
        }
    }
}
