//! Accumulation of the styles declared in `[V4 Styles]`/`[V4+ Styles]` sections.

use indexmap::IndexMap;

use super::format::{self, DEFAULT_STYLE_FORMAT, FieldSchema};
use super::{Error, Margins, Style};

/// A style [`FieldSchema`] together with the positions of the fields we care about,
/// resolved once when the schema is defined.
#[derive(Debug, Clone)]
struct StyleFormat {
    schema: FieldSchema,
    name: Option<usize>,
    margin_l: Option<usize>,
    margin_r: Option<usize>,
    margin_v: Option<usize>,
}

impl StyleFormat {
    fn new(schema: FieldSchema) -> Self {
        Self {
            name: schema.position("name"),
            margin_l: schema.position("marginl"),
            margin_r: schema.position("marginr"),
            margin_v: schema.position("marginv"),
            schema,
        }
    }

    fn parse(&self, line: &str) -> Result<Style, Error> {
        let fields = self.schema.parse_fields(line)?;

        // Margins not declared by the format are simply zero
        let margin = |index: Option<usize>, field: &'static str| -> Result<i32, Error> {
            fields
                .optional(index)
                .map_or(Ok(0), |value| format::parse_int(value, field))
        };

        Ok(Style {
            name: fields.required(self.name, "name")?.to_owned(),
            margins: Margins {
                left: margin(self.margin_l, "marginl")?,
                right: margin(self.margin_r, "marginr")?,
                vertical: margin(self.margin_v, "marginv")?,
            },
        })
    }
}

/// Builder for the [`Styles`] of one script. Owned by a single decode call.
#[derive(Debug, Clone)]
pub struct StyleTable {
    format: StyleFormat,
    styles: IndexMap<String, Style>,
}

impl StyleTable {
    /// Create an empty table using the default style format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: StyleFormat::new(FieldSchema::from_format(DEFAULT_STYLE_FORMAT)),
            styles: IndexMap::new(),
        }
    }

    /// Replace the style format with the one given by the value of a `Format:` line.
    /// Affects all styles recorded afterwards.
    pub fn define(&mut self, format: &str) {
        self.format = StyleFormat::new(FieldSchema::from_format(format));
    }

    /// Parse the value of a `Style:` line and add it to the table. A style with the same
    /// name as an earlier one replaces it, keeping the earlier position.
    ///
    /// # Errors
    /// Errors if the line has fewer fields than the current format, if the format has no
    /// `Name` field, or if a margin is not an integer.
    pub fn record(&mut self, line: &str) -> Result<&Style, Error> {
        let style = self.format.parse(line.trim())?;

        let entry = match self.styles.entry(style.name.clone()) {
            indexmap::map::Entry::Occupied(mut occupied) => {
                log::debug!("style {:?} redefined, replacing it", style.name);
                occupied.insert(style);
                occupied.into_mut()
            }
            indexmap::map::Entry::Vacant(vacant) => vacant.insert(style),
        };

        Ok(entry)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Freeze the table.
    #[must_use]
    pub fn finish(self) -> Styles {
        Styles {
            styles: self.styles,
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable, name-indexed collection of the styles declared by a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Styles {
    styles: IndexMap<String, Style>,
}

impl Styles {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over all styles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.values()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches2::assert_matches;

    use super::*;

    const DEFAULT_STYLE: &str = "Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,\
        0,0,0,0,100,100,0,0,1,2,2,2,10,20,30,1";

    #[test]
    fn record_with_default_format() -> Result<(), Error> {
        let mut table = StyleTable::new();
        let style = table.record(DEFAULT_STYLE)?;
        assert_eq!(style.name, "Default");
        assert_eq!(
            style.margins,
            Margins {
                left: 10,
                right: 20,
                vertical: 30,
            }
        );

        assert_eq!(table.len(), 1);
        assert!(table.get("Default").is_some());
        assert!(table.get("default").is_none());

        Ok(())
    }

    #[test]
    fn redefined_format() -> Result<(), Error> {
        let mut table = StyleTable::new();
        table.define(" MarginV, Name, MarginL");
        let style = table.record("5, Sign, 7")?;
        assert_eq!(style.name, "Sign");
        assert_eq!(
            style.margins,
            Margins {
                left: 7,
                right: 0,
                vertical: 5,
            }
        );

        Ok(())
    }

    #[test]
    fn last_write_wins() -> Result<(), Error> {
        let mut table = StyleTable::new();
        table.define("Name, MarginL, MarginR, MarginV");
        table.record("A, 1, 1, 1")?;
        table.record("B, 2, 2, 2")?;
        table.record("A, 3, 3, 3")?;

        let styles = table.finish();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles.get("A").map(|style| style.margins.left), Some(3));

        let names: Vec<&str> = styles.iter().map(|style| style.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        Ok(())
    }

    #[test]
    fn malformed_styles() {
        let mut table = StyleTable::new();
        table.define("Name, MarginL");
        assert_matches!(
            table.record("A, wide"),
            Err(Error::NumericField {
                field: "marginl",
                ..
            })
        );
        assert_matches!(
            table.record("A"),
            Err(Error::FieldCountMismatch { .. })
        );

        table.define("Fontname, MarginL");
        assert_matches!(table.record("Arial, 10"), Err(Error::MissingField("name")));

        assert!(table.finish().is_empty());
    }
}
