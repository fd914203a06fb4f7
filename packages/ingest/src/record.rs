//! Builds one [`CatalogRecord`] from a card page.
//!
//! Most fields come from the card infobox through
//! [`card_catalog_scraper::tables::resolve_label`]. The heading and lore
//! blocks are read directly, and the release date is the earliest value in
//! any release column on the page.

use card_catalog_models::{CatalogRecord, FieldLabel, TableMatrix};
use card_catalog_scraper::tables::{extract_tables, min_in_columns, resolve_label, resolve_split};
use card_catalog_scraper::{PageQuery, PageRenderer, ScrapeError, evaluate_as};

/// Substring identifying release-date columns.
const RELEASE_HEADER: &str = "Release";

/// Class names of the card page's fixed blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    pub heading_class: String,
    pub lore_class: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            heading_class: "heading".to_owned(),
            lore_class: "lore".to_owned(),
        }
    }
}

/// Extracts card records from card pages.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    selectors: PageSelectors,
}

impl RecordBuilder {
    #[must_use]
    pub const fn new(selectors: PageSelectors) -> Self {
        Self { selectors }
    }

    /// Navigates to `link` and extracts its record.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if navigation fails or the page has no
    /// heading or lore block. Missing infobox rows are not errors.
    pub async fn build(
        &self,
        renderer: &mut dyn PageRenderer,
        link: &str,
    ) -> Result<CatalogRecord, ScrapeError> {
        log::info!("Extracting {link}...");
        renderer.navigate(link).await?;

        let name = required_text(renderer, &self.selectors.heading_class).await?;
        let tables = extract_tables(renderer).await?;
        let description = required_text(renderer, &self.selectors.lore_class).await?;

        Ok(record_from_tables(name, link, description, &tables))
    }
}

/// Text of the first element with `class_name`, which must exist.
async fn required_text(
    renderer: &mut dyn PageRenderer,
    class_name: &str,
) -> Result<String, ScrapeError> {
    let query = PageQuery::FirstText {
        class_name: class_name.to_owned(),
    };
    let text: Option<String> = evaluate_as(renderer, &query).await?;
    text.ok_or_else(|| ScrapeError::MissingElement(format!(".{class_name}")))
}

/// Assembles a record from already extracted page parts.
#[must_use]
pub fn record_from_tables(
    name: String,
    link: &str,
    description: String,
    tables: &[TableMatrix],
) -> CatalogRecord {
    let mut types = resolve_split(tables, FieldLabel::Types);
    let monster_type = types.as_mut().and_then(|t| {
        if t.is_empty() {
            None
        } else {
            Some(t.remove(0))
        }
    });

    let attack_defense = resolve_split(tables, FieldLabel::AttackDefense);
    let attack_link = resolve_split(tables, FieldLabel::AttackLink);

    let attack = token(attack_defense.as_deref(), 0)
        .filter(|a| !a.is_empty())
        .or_else(|| token(attack_link.as_deref(), 0));

    CatalogRecord {
        name,
        link: link.to_owned(),
        description: Some(description),
        category: resolve_label(tables, FieldLabel::CardType),
        attribute: resolve_label(tables, FieldLabel::Attribute),
        monster_type,
        monster_card_types: types,
        level: resolve_label(tables, FieldLabel::Level),
        rank: resolve_label(tables, FieldLabel::Rank),
        link_rating: token(attack_link.as_deref(), 1),
        link_arrows: resolve_label(tables, FieldLabel::LinkArrows),
        pendulum_scale: resolve_label(tables, FieldLabel::PendulumScale),
        attack,
        defense: token(attack_defense.as_deref(), 1),
        password: resolve_label(tables, FieldLabel::Password),
        release: min_in_columns(tables, RELEASE_HEADER),
        property: resolve_label(tables, FieldLabel::Property),
    }
}

fn token(tokens: Option<&[String]>, index: usize) -> Option<String> {
    tokens.and_then(|t| t.get(index)).cloned()
}

#[cfg(test)]
mod tests {
    use card_catalog_scraper::memory::MemoryRenderer;

    use super::*;

    const DRAGON_URL: &str = "https://wiki.test/wiki/Blue-Eyes_White_Dragon";
    const LINK_URL: &str = "https://wiki.test/wiki/Decode_Talker";
    const SPELL_URL: &str = "https://wiki.test/wiki/Pot_of_Greed";

    fn card_page(
        heading: &str,
        rows: &[(&str, &str)],
        lore: Option<&str>,
        releases: &[&str],
    ) -> String {
        let infobox: String = rows
            .iter()
            .map(|(label, value)| format!("<tr><th>{label}</th><td>{value}</td></tr>"))
            .collect();
        let lore = lore.map_or_else(String::new, |l| {
            format!("<div class=\"lore\"><p>{l}</p></div>")
        });
        let release_rows: String = releases
            .iter()
            .map(|date| format!("<tr><td>{date}</td><td>SET-EN001</td></tr>"))
            .collect();
        format!(
            "<html><body>\
             <div class=\"heading\">{heading}</div>\
             <table class=\"innertable\">{infobox}</table>{lore}\
             <table><tr><th>Release</th><th>Number</th></tr>{release_rows}</table>\
             </body></html>"
        )
    }

    fn renderer() -> MemoryRenderer {
        MemoryRenderer::new()
            .with_page(
                DRAGON_URL,
                &card_page(
                    "Blue-Eyes White Dragon",
                    &[
                        ("Card type", "Monster"),
                        ("Attribute", "LIGHT"),
                        ("Types", "Dragon / Normal"),
                        ("Level", "8"),
                        ("ATK / DEF", "3000 / 2500"),
                        ("Password", "89631139"),
                    ],
                    Some("This legendary dragon is a powerful engine of destruction."),
                    &["2002-03-08", "", "2001-03-01"],
                ),
            )
            .with_page(
                LINK_URL,
                &card_page(
                    "Decode Talker",
                    &[
                        ("Card type", "Monster"),
                        ("Types", "Cyberse / Link / Effect"),
                        ("ATK / LINK", "2300 / 3"),
                        ("Link Arrows", "Top , Bottom-Left , Bottom-Right"),
                    ],
                    Some("2+ Effect Monsters"),
                    &[],
                ),
            )
            .with_page(
                SPELL_URL,
                &card_page(
                    "Pot of Greed",
                    &[("Card type", "Spell Card"), ("Property", "Normal")],
                    None,
                    &["2002-06-26"],
                ),
            )
    }

    #[tokio::test]
    async fn builds_monster_record() {
        let mut renderer = renderer();
        let record = RecordBuilder::default()
            .build(&mut renderer, DRAGON_URL)
            .await
            .unwrap();

        assert_eq!(record.name, "Blue-Eyes White Dragon");
        assert_eq!(record.link, DRAGON_URL);
        assert_eq!(
            record.description.as_deref(),
            Some("This legendary dragon is a powerful engine of destruction.")
        );
        assert_eq!(record.category.as_deref(), Some("Monster"));
        assert_eq!(record.attribute.as_deref(), Some("LIGHT"));
        assert_eq!(record.monster_type.as_deref(), Some("Dragon"));
        assert_eq!(record.monster_card_types, Some(vec!["Normal".to_owned()]));
        assert_eq!(record.level.as_deref(), Some("8"));
        assert_eq!(record.attack.as_deref(), Some("3000"));
        assert_eq!(record.defense.as_deref(), Some("2500"));
        assert_eq!(record.link_rating, None);
        assert_eq!(record.password.as_deref(), Some("89631139"));
        assert_eq!(record.release.as_deref(), Some("2001-03-01"));
        assert_eq!(record.rank, None);
        assert_eq!(record.property, None);
    }

    #[tokio::test]
    async fn builds_link_monster_record() {
        let mut renderer = renderer();
        let record = RecordBuilder::default()
            .build(&mut renderer, LINK_URL)
            .await
            .unwrap();

        assert_eq!(record.attack.as_deref(), Some("2300"));
        assert_eq!(record.link_rating.as_deref(), Some("3"));
        assert_eq!(record.defense, None);
        assert_eq!(record.monster_type.as_deref(), Some("Cyberse"));
        assert_eq!(
            record.monster_card_types,
            Some(vec!["Link".to_owned(), "Effect".to_owned()])
        );
        assert_eq!(
            record.link_arrows.as_deref(),
            Some("Top , Bottom-Left , Bottom-Right")
        );
        assert_eq!(record.release, None);
    }

    #[tokio::test]
    async fn missing_lore_aborts_build() {
        let mut renderer = renderer();
        let err = RecordBuilder::default()
            .build(&mut renderer, SPELL_URL)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement(ref e) if e == ".lore"));
    }

    #[tokio::test]
    async fn missing_heading_aborts_build() {
        let mut renderer = MemoryRenderer::new().with_page(
            SPELL_URL,
            "<html><body><div class=\"lore\">Draw 2 cards.</div></body></html>",
        );
        let err = RecordBuilder::default()
            .build(&mut renderer, SPELL_URL)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement(ref e) if e == ".heading"));
    }

    #[tokio::test]
    async fn custom_selectors_are_used() {
        let mut renderer = MemoryRenderer::new().with_page(
            SPELL_URL,
            "<h1 class=\"title\">Pot of Greed</h1><p class=\"text\">Draw 2 cards.</p>",
        );
        let builder = RecordBuilder::new(PageSelectors {
            heading_class: "title".to_owned(),
            lore_class: "text".to_owned(),
        });
        let record = builder.build(&mut renderer, SPELL_URL).await.unwrap();
        assert_eq!(record.name, "Pot of Greed");
        assert_eq!(record.description.as_deref(), Some("Draw 2 cards."));
        assert_eq!(record.category, None);
    }

    #[tokio::test]
    async fn linked_lore_and_fields_keep_page_text() {
        let mut renderer = MemoryRenderer::new().with_page(
            SPELL_URL,
            &card_page(
                "Royal <a href=\"/wiki/Decree\">Decree</a>",
                &[
                    ("Card type", "<a href=\"/wiki/Trap_Card\">Trap Card</a>"),
                    ("Property", "<a href=\"/wiki/Continuous\">Continuous</a>"),
                ],
                Some(
                    "All other <a href=\"/wiki/Trap_Card\">Trap Card</a> effects on the \
                     field are negated.<br>Trap Cards cannot be \
                     <a href=\"/wiki/Activate\">activate</a>d.",
                ),
                &[],
            ),
        );

        let record = RecordBuilder::default()
            .build(&mut renderer, SPELL_URL)
            .await
            .unwrap();

        assert_eq!(record.name, "Royal Decree");
        assert_eq!(record.category.as_deref(), Some("Trap Card"));
        assert_eq!(record.property.as_deref(), Some("Continuous"));
        assert_eq!(
            record.description.as_deref(),
            Some(
                "All other Trap Card effects on the field are negated.\n\
                 Trap Cards cannot be activated."
            )
        );
    }

    fn vertical(rows: &[(&str, &str)]) -> TableMatrix {
        TableMatrix {
            header: rows.iter().map(|(l, _)| (*l).to_owned()).collect(),
            data: rows.iter().map(|(_, v)| vec![(*v).to_owned()]).collect(),
            row_labels: rows.iter().map(|(l, _)| Some((*l).to_owned())).collect(),
        }
    }

    #[test]
    fn atk_def_is_preferred_over_atk_link() {
        let tables = vec![vertical(&[("ATK / DEF", "2500 / 2000"), ("ATK / LINK", "1 / 2")])];
        let record = record_from_tables("X".to_owned(), "x", "d".to_owned(), &tables);
        assert_eq!(record.attack.as_deref(), Some("2500"));
        assert_eq!(record.defense.as_deref(), Some("2000"));
        assert_eq!(record.link_rating.as_deref(), Some("2"));
    }

    #[test]
    fn atk_link_alone_supplies_attack_and_rating() {
        let tables = vec![vertical(&[("ATK / LINK", "2500 / 2")])];
        let record = record_from_tables("X".to_owned(), "x", "d".to_owned(), &tables);
        assert_eq!(record.attack.as_deref(), Some("2500"));
        assert_eq!(record.link_rating.as_deref(), Some("2"));
        assert_eq!(record.defense, None);
    }

    #[test]
    fn single_type_leaves_empty_card_types() {
        let tables = vec![vertical(&[("Types", "Spellcaster")])];
        let record = record_from_tables("X".to_owned(), "x", "d".to_owned(), &tables);
        assert_eq!(record.monster_type.as_deref(), Some("Spellcaster"));
        assert_eq!(record.monster_card_types, Some(vec![]));
    }

    #[test]
    fn non_monster_has_no_stats() {
        let tables = vec![vertical(&[("Card type", "Trap Card"), ("Property", "Counter")])];
        let record = record_from_tables("X".to_owned(), "x", "d".to_owned(), &tables);
        assert_eq!(record.property.as_deref(), Some("Counter"));
        assert_eq!(record.monster_type, None);
        assert_eq!(record.monster_card_types, None);
        assert_eq!(record.attack, None);
        assert_eq!(record.level, None);
    }
}
