use crate::{
    model::production::{ProductionTable, REGION_COLUMN},
    server::{
        error::Error,
        warehouse::{ResultSet, Statement, WarehouseSession},
    },
};

/// Table holding one row per region with one numeric column per year
pub const PRODUCTION_TABLE: &str = "BASE_AGRICULTURA";

pub const LIST_REGIONS_SQL: &str = r#"SELECT DISTINCT "Region" FROM BASE_AGRICULTURA"#;
pub const REGION_ROWS_SQL: &str = r#"SELECT * FROM BASE_AGRICULTURA WHERE "Region" = ?"#;

pub struct ProductionRepository<'a> {
    session: &'a WarehouseSession,
}

impl<'a> ProductionRepository<'a> {
    /// Creates a new instance of [`ProductionRepository`]
    pub fn new(session: &'a WarehouseSession) -> Self {
        Self { session }
    }

    /// Distinct region names in warehouse order
    pub async fn list_regions(&self) -> Result<Vec<String>, Error> {
        let result = self.session.execute(&Statement::new(LIST_REGIONS_SQL)).await?;

        Ok(result
            .column_values(REGION_COLUMN)?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }

    /// Every row of `region`, with the region bound as a statement value
    pub async fn fetch_region(&self, region: &str) -> Result<ProductionTable, Error> {
        let result = self
            .session
            .execute(&Statement::new(REGION_ROWS_SQL).bind(region))
            .await?;

        to_production_table(result)
    }
}

/// Converts a result set into a production table
///
/// Every column other than [`REGION_COLUMN`] is a year column. Cells hold the numbers as text;
/// NULL cells become `None`.
pub fn to_production_table(result: ResultSet) -> Result<ProductionTable, Error> {
    let region_index = result.column_index(REGION_COLUMN)?;
    let year_indices: Vec<usize> = (0..result.columns.len())
        .filter(|&index| index != region_index)
        .collect();

    let years = year_indices
        .iter()
        .map(|&index| result.columns[index].clone())
        .collect();
    let mut table = ProductionTable::new(years);

    for row in result.rows {
        let region = row
            .get(region_index)
            .cloned()
            .flatten()
            .unwrap_or_default();

        let values = year_indices
            .iter()
            .map(|&index| parse_amount(row.get(index).and_then(|cell| cell.as_deref())))
            .collect::<Result<Vec<_>, Error>>()?;

        table.push_row(region, values);
    }

    Ok(table)
}

fn parse_amount(cell: Option<&str>) -> Result<Option<f64>, Error> {
    cell.map(|text| {
        text.trim().parse::<f64>().map_err(|e| {
            Error::ParseError(format!("Failed to parse production amount {:?}: {}", text, e))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_set(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> ResultSet {
        ResultSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.map(str::to_string)).collect())
                .collect(),
        }
    }

    mod to_production_table_tests {
        use super::*;

        /// Expect year columns around the region column and NULL cells as None
        #[test]
        fn converts_wide_rows() {
            let result = result_set(
                &["2020", "Region", "2021"],
                vec![vec![Some("250000000"), Some("Brazil"), None]],
            );

            let table = to_production_table(result).unwrap();

            assert_eq!(table.years, vec!["2020", "2021"]);
            assert_eq!(table.rows[0].region, "Brazil");
            assert_eq!(table.rows[0].values, vec![Some(250000000.0), None]);
        }

        /// Expect decimal and exponent notation to parse
        #[test]
        fn parses_number_formats() {
            let result = result_set(
                &["Region", "2020", "2021"],
                vec![vec![Some("Peru"), Some("1.5E8"), Some("260000000.000")]],
            );

            let table = to_production_table(result).unwrap();

            assert_eq!(table.rows[0].values, vec![Some(150000000.0), Some(260000000.0)]);
        }

        /// Expect a parse error for non-numeric cells
        #[test]
        fn rejects_non_numeric_cells() {
            let result = result_set(&["Region", "2020"], vec![vec![Some("Peru"), Some("n/a")]]);

            assert!(matches!(
                to_production_table(result),
                Err(Error::ParseError(_))
            ));
        }

        /// Expect a missing column error when the region column is absent
        #[test]
        fn requires_region_column() {
            let result = result_set(&["2020"], vec![]);

            assert!(matches!(
                to_production_table(result),
                Err(Error::WarehouseError(_))
            ));
        }
    }

    mod production_repository_tests {
        use harvest_test_utils::prelude::*;

        use crate::server::util::test::setup::TestContextExt;

        use super::*;

        /// Expect region names in warehouse order
        #[tokio::test]
        async fn lists_regions() -> Result<(), TestError> {
            let mut test = TestBuilder::new().build().await?;
            let _session = test.warehouse().with_session_endpoint("4711", 1);
            let regions = test.warehouse().with_statement_endpoint(
                LIST_REGIONS_SQL,
                &["Region"],
                vec![vec![Some("Peru")], vec![Some("Brazil")]],
                1,
            );

            let session = test.snowflake_client().connect().await.unwrap();
            let result = ProductionRepository::new(&session).list_regions().await.unwrap();

            assert_eq!(result, vec!["Peru", "Brazil"]);
            regions.assert();

            Ok(())
        }

        /// Expect the region to be sent as a binding, never spliced into the statement
        #[tokio::test]
        async fn binds_region_value() -> Result<(), TestError> {
            let mut test = TestBuilder::new().build().await?;
            let _session = test.warehouse().with_session_endpoint("4711", 1);
            let rows = test.warehouse().with_bound_statement_endpoint(
                REGION_ROWS_SQL,
                "Cote d'Ivoire",
                &["Region", "2020"],
                vec![vec![Some("Cote d'Ivoire"), Some("1000000")]],
                1,
            );

            let session = test.snowflake_client().connect().await.unwrap();
            let table = ProductionRepository::new(&session)
                .fetch_region("Cote d'Ivoire")
                .await
                .unwrap();

            assert_eq!(table.len(), 1);
            assert_eq!(table.rows[0].values, vec![Some(1000000.0)]);
            rows.assert();

            Ok(())
        }
    }
}
