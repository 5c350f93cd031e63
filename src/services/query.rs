use crate::models::selection::{Dimensions, Selection};

/// Flat query parameters in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Param {
    key: &'static str,
    values: Vec<String>,
    joined: String,
}

impl QueryParams {
    /// Raw value for `key`; lists come back comma-joined.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.joined.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `key=value` pairs joined by `&`.
    ///
    /// Each list element is percent-encoded on its own so the separating
    /// commas stay literal.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|p| {
                let encoded: Vec<_> = p.values.iter().map(|v| urlencoding::encode(v)).collect();
                format!("{}={}", p.key, encoded.join(","))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn push(&mut self, key: &'static str, values: Vec<String>) {
        let joined = values.join(",");
        self.pairs.push(Param {
            key,
            values,
            joined,
        });
    }

    /// Singular key for one value, plural comma-joined key for several,
    /// nothing for none.
    fn push_dimension<T: ToString>(
        &mut self,
        singular: &'static str,
        plural: &'static str,
        values: impl Iterator<Item = T>,
    ) {
        let values: Vec<String> = values.map(|v| v.to_string()).collect();
        match values.len() {
            0 => {}
            1 => self.push(singular, values),
            _ => self.push(plural, values),
        }
    }
}

/// Derives endpoint parameters from a selection.
///
/// Each date dimension is encoded independently, so months may be plural
/// while years are singular.
pub fn shape(selection: &Selection, dimensions: Dimensions) -> QueryParams {
    let mut params = QueryParams::default();

    if let Some(id) = selection.site().id() {
        params.push("siteId", vec![id.to_string()]);
    }
    if dimensions.month {
        params.push_dimension("month", "months", selection.months().iter());
    }
    if dimensions.year {
        params.push_dimension("year", "years", selection.years().iter());
    }

    params
}
