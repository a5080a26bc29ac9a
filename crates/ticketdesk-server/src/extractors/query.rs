use serde::Deserialize;

/// Query parameters de `/api/search/orders`.
///
/// Ambos campos se aceptan como texto para que un `limit` invalido no
/// rechace la request.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SearchParams {
    /// Texto a buscar en el identificador del pedido.
    pub q: Option<String>,

    /// Maximo de resultados.
    pub limit: Option<String>,
}

impl SearchParams {
    /// Returns the search text, empty when absent.
    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    /// Parses `limit`, falling back to `default` when it is absent or not a
    /// non-negative integer.
    pub fn limit_or(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(default)
    }
}
