//! Field schemas declared by `Format:` lines, and splitting of data lines according to them.

use std::num::ParseIntError;
use std::str::FromStr;

use super::Error;

/// Event format assumed until the script declares its own.
pub const DEFAULT_EVENT_FORMAT: &str =
    "Start, ReadOrder, Layer, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Style format assumed until the script declares its own.
pub const DEFAULT_STYLE_FORMAT: &str = "Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
    OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
    BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

/// Ordered list of field names, as declared by the value of a `Format:` line.
/// Names are stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    names: Vec<String>,
}

impl FieldSchema {
    /// Parse the value of a `Format:` line (everything after the colon).
    #[must_use]
    pub fn from_format(format: &str) -> Self {
        Self {
            names: format
                .split(',')
                .map(|name| name.trim().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Position of the field with the given name, compared case-insensitively.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|field| field.eq_ignore_ascii_case(name))
    }

    /// Split a data line into one value per field. The line is split on at most
    /// `self.len() - 1` commas, so the last field keeps any commas it contains.
    /// Every value is trimmed.
    ///
    /// # Errors
    /// Returns [`Error::FieldCountMismatch`] if the line has fewer fields than the schema.
    pub fn parse_fields<'a>(&'a self, line: &'a str) -> Result<Fields<'a>, Error> {
        let values: Vec<&str> = line.splitn(self.names.len(), ',').map(str::trim).collect();

        if values.len() < self.names.len() {
            return Err(Error::FieldCountMismatch {
                expected: self.names.len(),
                found: values.len(),
            });
        }

        Ok(Fields {
            schema: self,
            values,
        })
    }
}

/// The values of one data line, paired with the schema they were split with.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    schema: &'a FieldSchema,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    /// Value of the field with the given name, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.schema.position(name).and_then(|index| self.at(index))
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.schema.names().zip(self.values.iter().copied())
    }

    /// Value at a position resolved from the schema beforehand, for fields the caller
    /// cannot do without.
    pub(super) fn required(
        &self,
        index: Option<usize>,
        field: &'static str,
    ) -> Result<&'a str, Error> {
        index
            .and_then(|index| self.at(index))
            .ok_or(Error::MissingField(field))
    }

    pub(super) fn optional(&self, index: Option<usize>) -> Option<&'a str> {
        index.and_then(|index| self.at(index))
    }
}

pub(super) fn parse_int<T>(value: &str, field: &'static str) -> Result<T, Error>
where
    T: FromStr<Err = ParseIntError>,
{
    value.parse::<T>().map_err(|source| Error::NumericField {
        field,
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches2::assert_matches;

    use super::*;

    #[test]
    fn schema_from_format() {
        let schema = FieldSchema::from_format(" Layer, Start,End ,  MarginL,Text");
        assert_eq!(schema.len(), 5);
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            ["layer", "start", "end", "marginl", "text"]
        );
        assert_eq!(schema.position("MarginL"), Some(3));
        assert_eq!(schema.position("Effect"), None);

        let default_events = FieldSchema::from_format(DEFAULT_EVENT_FORMAT);
        assert_eq!(default_events.len(), 10);
        assert_eq!(default_events.position("readorder"), Some(1));

        let default_styles = FieldSchema::from_format(DEFAULT_STYLE_FORMAT);
        assert_eq!(default_styles.len(), 23);
        assert_eq!(default_styles.position("marginv"), Some(21));
    }

    #[test]
    fn last_field_keeps_delimiters() -> Result<(), Error> {
        let schema = FieldSchema::from_format("a,b,c");
        let fields = schema.parse_fields("1, 2, x:y,z")?;

        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("a"), Some("1"));
        assert_eq!(fields.get("b"), Some("2"));
        assert_eq!(fields.get("c"), Some("x:y,z"));
        assert_eq!(fields.get("d"), None);
        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            [("a", "1"), ("b", "2"), ("c", "x:y,z")]
        );

        Ok(())
    }

    #[test]
    fn values_are_trimmed() -> Result<(), Error> {
        let schema = FieldSchema::from_format("a,b");
        let fields = schema.parse_fields("  one ,   two, three  ")?;
        assert_eq!(fields.at(0), Some("one"));
        assert_eq!(fields.at(1), Some("two, three"));

        let fields = schema.parse_fields(",")?;
        assert_eq!(fields.at(0), Some(""));
        assert_eq!(fields.at(1), Some(""));

        Ok(())
    }

    #[test]
    fn too_few_fields() {
        let schema = FieldSchema::from_format("a,b,c");
        assert_matches!(
            schema.parse_fields("1,2"),
            Err(Error::FieldCountMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_matches!(
            schema.parse_fields(""),
            Err(Error::FieldCountMismatch {
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn required_and_optional() -> Result<(), Error> {
        let schema = FieldSchema::from_format("a,b");
        let fields = schema.parse_fields("1,2")?;

        assert_eq!(fields.required(schema.position("b"), "b")?, "2");
        assert_matches!(
            fields.required(schema.position("z"), "z"),
            Err(Error::MissingField("z"))
        );
        assert_eq!(fields.optional(schema.position("a")), Some("1"));
        assert_eq!(fields.optional(None), None);

        Ok(())
    }

    #[test]
    fn int_fields() -> Result<(), Error> {
        assert_eq!(parse_int::<i32>("15", "marginl")?, 15);
        assert_eq!(parse_int::<i32>("-3", "layer")?, -3);
        assert_eq!(parse_int::<usize>("7", "readorder")?, 7);

        assert_matches!(
            parse_int::<i32>("1.5", "marginr"),
            Err(Error::NumericField { field, value, .. })
        );
        assert_eq!(field, "marginr");
        assert_eq!(value, "1.5");

        assert_matches!(
            parse_int::<usize>("-1", "readorder"),
            Err(Error::NumericField { .. })
        );

        Ok(())
    }
}
