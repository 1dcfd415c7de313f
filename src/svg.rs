//! SVG markup rendering.

use crate::error::LsError;
use crate::interpreter::{get_multi_path_svg_data, get_svg_data};
use crate::params::LsParams;
use crate::turtle::DrawingRect;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Attributes every `<path>` gets unless overridden.
pub const DEFAULT_PATH_ATTRIBUTES: [(&str, &str); 2] = [("fill", "none"), ("stroke", "#000")];

/// Value of a `<path>` attribute.
///
/// With multiple paths, the i-th path takes the i-th list entry; paths past
/// the end of the list reuse the last one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Single(String),
    List(Vec<String>),
}

impl AttrValue {
    /// The value for the path at `index`, or `None` for an empty list.
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            AttrValue::Single(value) => Some(value),
            AttrValue::List(values) => values
                .get(index.min(values.len().saturating_sub(1)))
                .map(String::as_str),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Single(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for AttrValue {
    fn from(values: Vec<S>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// `<path>` attributes in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathAttributes(Vec<(String, AttrValue)>);

impl PathAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, keeping its original position if it is already present.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The defaults overridden by `self`.
    fn resolved(&self) -> PathAttributes {
        let mut attributes = PathAttributes::new();
        for (name, value) in DEFAULT_PATH_ATTRIBUTES {
            attributes.set(name, value);
        }
        for (name, value) in &self.0 {
            attributes.set(name.clone(), value.clone());
        }
        attributes
    }

    /// ` name="value"` pairs for the path at `index`, quotes escaped.
    fn to_attr_string(&self, index: usize) -> String {
        self.iter()
            .filter_map(|(name, value)| value.at(index).map(|v| (name, v)))
            .map(|(name, value)| format!(" {name}=\"{}\"", value.replace('"', "&quot;")))
            .collect()
    }
}

impl Serialize for PathAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PathAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = PathAttributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute names to a string or a list of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut attributes = PathAttributes::new();
                while let Some((name, value)) = access.next_entry::<String, AttrValue>()? {
                    attributes.set(name, value);
                }
                Ok(attributes)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Output options for the rendered markup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgParams {
    /// Rendered width; the natural drawing width when unset, zero or NaN.
    pub width: Option<f64>,

    /// Rendered height; the natural drawing height when unset, zero or NaN.
    pub height: Option<f64>,

    /// Extra space added to every side of the viewBox.
    pub padding: f64,

    /// Attributes for the `<path>` elements, merged over `fill="none" stroke="#000"`.
    pub path_attributes: PathAttributes,
}

impl SvgParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.path_attributes.set(name, value);
        self
    }
}

/// Shortest representation, without a fractional part for integers and with `-0` as `0`.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_owned()
    } else {
        value.to_string()
    }
}

/// A zero or NaN size counts as unset.
fn explicit_size(size: Option<f64>) -> Option<f64> {
    size.filter(|s| *s != 0.0 && !s.is_nan())
}

/// Renders `paths` into a root `<svg>` element, one `<path>` per entry.
///
/// The i-th path receives the i-th value of every list attribute.
pub fn render_svg<S: AsRef<str>>(paths: &[S], rect: &DrawingRect, params: &SvgParams) -> String {
    let padding = params.padding;
    let view_box = [
        rect.min_x - padding,
        rect.min_y - padding,
        rect.width + 2.0 * padding,
        rect.height + 2.0 * padding,
    ]
    .map(format_number)
    .join(" ");
    let width = format_number(explicit_size(params.width).unwrap_or(rect.width));
    let height = format_number(explicit_size(params.height).unwrap_or(rect.height));

    let attributes = params.path_attributes.resolved();
    let content: String = paths
        .iter()
        .enumerate()
        .map(|(index, data)| {
            format!(
                "<path d=\"{}\"{}></path>",
                data.as_ref(),
                attributes.to_attr_string(index)
            )
        })
        .collect();

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{view_box}\" height=\"{height}\" width=\"{width}\">{content}</svg>"
    )
}

/// Ready-to-render markup with a single `<path>`.
pub fn get_svg_code(params: &LsParams, svg_params: &SvgParams) -> Result<String, LsError> {
    let data = get_svg_data(params)?;
    Ok(render_svg(&[data.path_data], &data.rect, svg_params))
}

/// Ready-to-render markup with one `<path>` per branch level that draws something.
pub fn get_multi_path_svg_code(
    params: &LsParams,
    svg_params: &SvgParams,
) -> Result<String, LsError> {
    let data = get_multi_path_svg_data(params)?;
    Ok(render_svg(data.multi_path_data.as_slice(), &data.rect, svg_params))
}
