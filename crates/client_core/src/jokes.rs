//! Cosmetic jokes rotated while an update request is in flight.

pub const DEFAULT_JOKES: &[&str] = &[
    "¿Por qué los datos siempre están tristes? Porque viven en la base... de datos 😢",
    "¿Qué le dice un NPS a otro NPS? ¡Nos vemos en el dashboard! 📊",
    "¿Por qué el servidor fue al psicólogo? Tenía problemas de conexión 🔌",
    "¿Cómo se llama el pez que mide la satisfacción? El NPS-cado 🐟",
    "¿Por qué los algoritmos no pueden mentir? Porque siempre dicen la verdad binaria 🤖",
    "¿Qué hace un desarrollador cuando está aburrido? Hace un commit y se va 💻",
    "¿Por qué los datos no van al gimnasio? Porque ya están en forma... de tabla 💪",
    "¿Cómo se despiden las APIs? ¡Nos vemos en el endpoint! 🚀",
];

/// Read-only, never-empty joke list with cyclic indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeBook {
    jokes: Vec<String>,
}

impl JokeBook {
    /// Returns `None` when `jokes` is empty.
    pub fn new<I, S>(jokes: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let jokes: Vec<String> = jokes.into_iter().map(Into::into).collect();
        if jokes.is_empty() {
            return None;
        }
        Some(Self { jokes })
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.jokes[index % self.jokes.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.jokes.len()
    }
}

impl Default for JokeBook {
    fn default() -> Self {
        Self {
            jokes: DEFAULT_JOKES.iter().map(|joke| joke.to_string()).collect(),
        }
    }
}
