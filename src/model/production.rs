//! Production table shared between the server and the web client.
//!
//! The warehouse returns production figures in wide form: one row per region with one
//! column per calendar year. The server ships that table to the client already scaled to
//! display units, and both sides use [`ProductionTable::melt`] to reshape it into the long
//! form the chart is drawn from.

use serde::{Deserialize, Serialize};

/// Divisor applied to raw warehouse amounts before display.
pub const DISPLAY_DIVISOR: f64 = 1_000_000.0;

/// Name of the column holding the region key in the warehouse table.
pub const REGION_COLUMN: &str = "Region";

/// Production figures for one region, aligned with [`ProductionTable::years`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ProductionRow {
    /// Region the figures belong to
    pub region: String,
    /// One value per year column, `None` where the warehouse holds NULL
    pub values: Vec<Option<f64>>,
}

/// Wide production table: rows keyed by region, one column per year.
///
/// Region is not unique; concatenating per-region results keeps duplicate rows exactly as
/// the warehouse returned them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ProductionTable {
    /// Year column names in warehouse order
    pub years: Vec<String>,
    /// Table rows in fetch order
    pub rows: Vec<ProductionRow>,
}

/// One (year, region, value) triple of the long-form table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionPoint {
    pub year: String,
    pub region: String,
    pub value: Option<f64>,
}

impl ProductionPoint {
    /// Year as a number for the temporal chart axis.
    pub fn year_number(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }
}

impl ProductionTable {
    pub fn new(years: Vec<String>) -> Self {
        Self {
            years,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Appends a row, padding or truncating its values to the table's year columns.
    pub fn push_row(&mut self, region: impl Into<String>, mut values: Vec<Option<f64>>) {
        values.resize(self.years.len(), None);

        self.rows.push(ProductionRow {
            region: region.into(),
            values,
        });
    }

    /// Concatenates tables in iteration order without deduplicating rows.
    ///
    /// Year columns are unioned by name in first-seen order; cells for a year a source
    /// table did not carry are `None`.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = ProductionTable>,
    {
        let mut combined = ProductionTable::default();

        for table in tables {
            for year in &table.years {
                if !combined.years.contains(year) {
                    combined.years.push(year.clone());
                    for row in combined.rows.iter_mut() {
                        row.values.push(None);
                    }
                }
            }

            for row in table.rows {
                let mut values = vec![None; combined.years.len()];

                for (year, value) in table.years.iter().zip(row.values) {
                    let slot = combined
                        .years
                        .iter()
                        .position(|y| y == year)
                        .and_then(|index| values.get_mut(index));

                    if let Some(slot) = slot {
                        *slot = value;
                    }
                }

                combined.rows.push(ProductionRow {
                    region: row.region,
                    values,
                });
            }
        }

        combined
    }

    /// Returns a copy with every value divided by `divisor`.
    pub fn scaled(&self, divisor: f64) -> Self {
        Self {
            years: self.years.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| ProductionRow {
                    region: row.region.clone(),
                    values: row.values.iter().map(|v| v.map(|v| v / divisor)).collect(),
                })
                .collect(),
        }
    }

    /// Table in display units (raw amounts divided by [`DISPLAY_DIVISOR`]).
    pub fn to_display_units(&self) -> Self {
        self.scaled(DISPLAY_DIVISOR)
    }

    /// Returns a copy with rows sorted by region; rows of the same region keep their order.
    pub fn sorted_by_region(&self) -> Self {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.region.cmp(&b.region));

        Self {
            years: self.years.clone(),
            rows,
        }
    }

    /// Distinct regions in row order.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !regions.contains(&row.region.as_str()) {
                regions.push(&row.region);
            }
        }
        regions
    }

    /// Reshapes the wide table into long form.
    ///
    /// Equivalent to transposing so years become rows and melting the region columns:
    /// points are emitted region by region, each region covering every year column.
    pub fn melt(&self) -> Vec<ProductionPoint> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.years
                    .iter()
                    .zip(row.values.iter())
                    .map(|(year, value)| ProductionPoint {
                        year: year.clone(),
                        region: row.region.clone(),
                        value: *value,
                    })
            })
            .collect()
    }

    /// Pivots long-form points back into a wide table on {region, year}.
    ///
    /// Regions and years appear in first-seen order. A later point for the same
    /// (region, year) pair overwrites an earlier one.
    pub fn pivot(points: &[ProductionPoint]) -> Self {
        let mut table = ProductionTable::default();

        for point in points {
            if !table.years.contains(&point.year) {
                table.years.push(point.year.clone());
            }
        }

        for point in points {
            let year_index = table.years.iter().position(|y| *y == point.year);
            let row_index = match table.rows.iter().position(|r| r.region == point.region) {
                Some(index) => index,
                None => {
                    table.push_row(point.region.clone(), Vec::new());
                    table.rows.len() - 1
                }
            };

            let slot = year_index.and_then(|year_index| {
                table
                    .rows
                    .get_mut(row_index)
                    .and_then(|row| row.values.get_mut(year_index))
            });

            if let Some(slot) = slot {
                *slot = point.value;
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(years: &[&str]) -> Vec<String> {
        years.iter().map(|y| y.to_string()).collect()
    }

    fn brazil_and_chile() -> ProductionTable {
        let mut table = ProductionTable::new(years(&["2020", "2021"]));
        table.push_row("Brazil", vec![Some(250_000_000.0), Some(260_000_000.0)]);
        table.push_row("Chile", vec![Some(12_000_000.0), None]);
        table
    }

    mod concat {
        use super::*;

        /// Expect rows of every table in input order without deduplication
        #[test]
        fn keeps_rows_in_input_order() {
            let mut brazil = ProductionTable::new(years(&["2020"]));
            brazil.push_row("Brazil", vec![Some(1.0)]);
            let mut chile = ProductionTable::new(years(&["2020"]));
            chile.push_row("Chile", vec![Some(2.0)]);
            chile.push_row("Chile", vec![Some(3.0)]);

            let combined = ProductionTable::concat(vec![brazil, chile]);

            assert_eq!(combined.years, years(&["2020"]));
            let regions: Vec<&str> = combined.rows.iter().map(|r| r.region.as_str()).collect();
            assert_eq!(regions, vec!["Brazil", "Chile", "Chile"]);
        }

        /// Expect concatenation to be a pure per-region union
        #[test]
        fn concat_of_parts_equals_concat_of_whole() {
            let table = brazil_and_chile();
            let mut brazil = ProductionTable::new(table.years.clone());
            brazil.rows.push(table.rows[0].clone());
            let mut chile = ProductionTable::new(table.years.clone());
            chile.rows.push(table.rows[1].clone());

            let combined = ProductionTable::concat(vec![brazil, chile]);

            assert_eq!(combined, table);
        }

        /// Expect differing year columns to be unioned with missing cells left empty
        #[test]
        fn unions_year_columns() {
            let mut early = ProductionTable::new(years(&["2019", "2020"]));
            early.push_row("Brazil", vec![Some(1.0), Some(2.0)]);
            let mut late = ProductionTable::new(years(&["2020", "2021"]));
            late.push_row("Chile", vec![Some(3.0), Some(4.0)]);

            let combined = ProductionTable::concat(vec![early, late]);

            assert_eq!(combined.years, years(&["2019", "2020", "2021"]));
            assert_eq!(combined.rows[0].values, vec![Some(1.0), Some(2.0), None]);
            assert_eq!(combined.rows[1].values, vec![None, Some(3.0), Some(4.0)]);
        }

        /// Expect an empty table when nothing is concatenated
        #[test]
        fn empty_input_yields_empty_table() {
            let combined = ProductionTable::concat(Vec::new());

            assert!(combined.is_empty());
            assert!(combined.years.is_empty());
        }
    }

    mod scaling {
        use super::*;

        /// Expect every cell divided by one million and NULL cells kept empty
        #[test]
        fn divides_every_cell_by_one_million() {
            let raw = brazil_and_chile();

            let scaled = raw.to_display_units();

            for (raw_row, scaled_row) in raw.rows.iter().zip(scaled.rows.iter()) {
                assert_eq!(raw_row.region, scaled_row.region);
                for (raw_value, scaled_value) in raw_row.values.iter().zip(&scaled_row.values) {
                    assert_eq!(raw_value.map(|v| v / 1_000_000.0), *scaled_value);
                }
            }
            assert_eq!(scaled.rows[0].values, vec![Some(250.0), Some(260.0)]);
            assert_eq!(scaled.rows[1].values, vec![Some(12.0), None]);
        }

        /// Expect sorting by region to be stable for duplicate regions
        #[test]
        fn sorts_by_region_stably() {
            let mut table = ProductionTable::new(years(&["2020"]));
            table.push_row("Peru", vec![Some(1.0)]);
            table.push_row("Argentina", vec![Some(2.0)]);
            table.push_row("Peru", vec![Some(3.0)]);

            let sorted = table.sorted_by_region();

            let rows: Vec<(&str, Option<f64>)> = sorted
                .rows
                .iter()
                .map(|r| (r.region.as_str(), r.values[0]))
                .collect();
            assert_eq!(
                rows,
                vec![("Argentina", Some(2.0)), ("Peru", Some(1.0)), ("Peru", Some(3.0))]
            );
        }
    }

    mod reshape {
        use super::*;

        /// Expect the worked Brazil example to melt into one point per year
        #[test]
        fn melts_brazil_example() {
            let mut table = ProductionTable::new(years(&["2020", "2021"]));
            table.push_row("Brazil", vec![Some(250_000_000.0), Some(260_000_000.0)]);

            let points = table.to_display_units().melt();

            assert_eq!(
                points,
                vec![
                    ProductionPoint {
                        year: "2020".to_string(),
                        region: "Brazil".to_string(),
                        value: Some(250.0),
                    },
                    ProductionPoint {
                        year: "2021".to_string(),
                        region: "Brazil".to_string(),
                        value: Some(260.0),
                    },
                ]
            );
        }

        /// Expect melt followed by pivot to recover the scaled table
        #[test]
        fn pivot_inverts_melt() {
            let scaled = brazil_and_chile().to_display_units();

            let recovered = ProductionTable::pivot(&scaled.melt());

            assert_eq!(recovered, scaled);
        }

        /// Expect numeric year parsing for the chart axis
        #[test]
        fn parses_year_numbers() {
            let point = ProductionPoint {
                year: "1999".to_string(),
                region: "Peru".to_string(),
                value: None,
            };

            assert_eq!(point.year_number(), Some(1999));
        }
    }
}
