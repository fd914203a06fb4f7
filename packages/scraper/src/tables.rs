//! Table extraction and vertical-table field lookup.
//!
//! Card pages have no fixed schema: the infobox is a key/value table whose
//! rows appear, disappear, and reorder from card to card. Fields are
//! therefore looked up by row label across every table on the page rather
//! than by position.

use card_catalog_models::{FieldLabel, TableMatrix};

use crate::{PageQuery, PageRenderer, ScrapeError, evaluate_as};

/// Reads every table on the current page, in document order.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the query fails or its answer is malformed.
pub async fn extract_tables(
    renderer: &mut dyn PageRenderer,
) -> Result<Vec<TableMatrix>, ScrapeError> {
    evaluate_as(renderer, &PageQuery::Tables).await
}

/// Finds the value of the row labelled `label` in any vertical table.
///
/// A row only counts when it has exactly one data cell and that cell is not
/// blank once trimmed; wider rows belong to layout tables and are skipped.
/// The first qualifying row in document order wins. Labels are assumed to be
/// unique per page; a duplicate label in a later table is never seen.
#[must_use]
pub fn resolve_field(tables: &[TableMatrix], label: &str) -> Option<String> {
    tables
        .iter()
        .flat_map(TableMatrix::labeled_rows)
        .filter(|(row_label, _)| *row_label == Some(label))
        .find_map(|(_, cells)| match cells {
            [value] => Some(value.trim()).filter(|v| !v.is_empty()).map(str::to_owned),
            _ => None,
        })
}

/// [`resolve_field`] for one of the known infobox labels.
#[must_use]
pub fn resolve_label(tables: &[TableMatrix], label: FieldLabel) -> Option<String> {
    let value = resolve_field(tables, label.as_ref());
    if value.is_none() {
        log::trace!("No '{label}' row on page");
    }
    value
}

/// Resolves `label` and splits its value on `/`, trimming each token.
#[must_use]
pub fn resolve_split(tables: &[TableMatrix], label: FieldLabel) -> Option<Vec<String>> {
    resolve_label(tables, label).map(|value| {
        value
            .split('/')
            .map(|token| token.trim().to_owned())
            .collect()
    })
}

/// Lexicographic minimum of the non-empty cells in every column whose
/// header contains `needle`, across all tables.
///
/// Values are compared as plain strings. This is only a chronological
/// minimum when every value uses the same sortable date format.
#[must_use]
pub fn min_in_columns(tables: &[TableMatrix], needle: &str) -> Option<String> {
    tables
        .iter()
        .flat_map(|table| {
            table
                .columns_containing(needle)
                .into_iter()
                .flat_map(move |column| table.data.iter().filter_map(move |row| row.get(column)))
        })
        .filter(|value| !value.is_empty())
        .min()
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(rows: &[(&str, &[&str])]) -> TableMatrix {
        TableMatrix {
            header: rows.iter().map(|(label, _)| (*label).to_owned()).collect(),
            data: rows
                .iter()
                .map(|(_, cells)| cells.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
            row_labels: rows.iter().map(|(label, _)| Some((*label).to_owned())).collect(),
        }
    }

    fn release_table(header: &[&str], rows: &[&[&str]]) -> TableMatrix {
        TableMatrix {
            header: header.iter().map(|h| (*h).to_owned()).collect(),
            data: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
            row_labels: vec![None; rows.len()],
        }
    }

    #[test]
    fn resolves_single_value_rows() {
        let tables = vec![vertical(&[
            ("Card type", &["Monster"]),
            ("Attribute", &["  DARK "]),
        ])];
        assert_eq!(resolve_field(&tables, "Attribute").as_deref(), Some("DARK"));
        assert_eq!(
            resolve_label(&tables, FieldLabel::CardType).as_deref(),
            Some("Monster")
        );
    }

    #[test]
    fn absent_label_resolves_to_none() {
        let tables = vec![vertical(&[("Card type", &["Spell Card"])])];
        assert_eq!(resolve_field(&tables, "Level"), None);
        assert_eq!(resolve_field(&[], "Level"), None);
    }

    #[test]
    fn label_match_is_exact() {
        let tables = vec![vertical(&[("Card type", &["Trap Card"])])];
        assert_eq!(resolve_field(&tables, "Card Type"), None);
        assert_eq!(resolve_field(&tables, "Card type "), None);
    }

    #[test]
    fn multi_cell_rows_are_ambiguous() {
        let tables = vec![vertical(&[("Level", &["4", "Star"])])];
        assert_eq!(resolve_field(&tables, "Level"), None);
    }

    #[test]
    fn ambiguous_row_does_not_hide_later_match() {
        let tables = vec![
            vertical(&[("Level", &["4", "Star"])]),
            vertical(&[("Level", &["7"])]),
        ];
        assert_eq!(resolve_field(&tables, "Level").as_deref(), Some("7"));
    }

    #[test]
    fn earlier_table_wins_on_duplicate_labels() {
        let tables = vec![
            vertical(&[("Password", &["89631139"])]),
            vertical(&[("Password", &["00000000"])]),
        ];
        assert_eq!(
            resolve_field(&tables, "Password").as_deref(),
            Some("89631139")
        );
    }

    #[test]
    fn splits_slash_separated_values() {
        let tables = vec![vertical(&[
            ("Types", &["Dragon / Effect / Tuner"]),
            ("ATK / DEF", &["2500 / 2000"]),
        ])];
        assert_eq!(
            resolve_split(&tables, FieldLabel::Types).unwrap(),
            vec!["Dragon", "Effect", "Tuner"]
        );
        assert_eq!(
            resolve_split(&tables, FieldLabel::AttackDefense).unwrap(),
            vec!["2500", "2000"]
        );
        assert_eq!(resolve_split(&tables, FieldLabel::AttackLink), None);
    }

    #[test]
    fn earliest_release_spans_tables_and_columns() {
        let tables = vec![
            release_table(
                &["Release", "Number"],
                &[&[], &["2008-03-20", "A"], &["2010-01-01", "B"]],
            ),
            release_table(&["Set", "Release"], &[&["C", "2009-05-05"]]),
            vertical(&[("Level", &["4"])]),
        ];
        assert_eq!(
            min_in_columns(&tables, "Release").as_deref(),
            Some("2008-03-20")
        );
    }

    #[test]
    fn empty_release_cells_are_ignored() {
        let tables = vec![release_table(
            &["North American release"],
            &[&[""], &["2004-03-01"]],
        )];
        assert_eq!(
            min_in_columns(&tables, "Release"),
            None,
            "header match is case-sensitive"
        );
        assert_eq!(
            min_in_columns(&tables, "release").as_deref(),
            Some("2004-03-01")
        );
    }
}
