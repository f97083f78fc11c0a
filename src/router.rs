use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Calendar,
    About,
    Chat,
    Tasks,
    Mandates,
    NotFound,
}

impl Route {
    /// Query strings and fragments are dropped; trailing slashes are ignored.
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim().trim_end_matches('/') {
            "" => Self::Calendar,
            "/about" => Self::About,
            "/chat" => Self::Chat,
            "/tasks" => Self::Tasks,
            "/mandates" => Self::Mandates,
            _ => Self::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Calendar => "/",
            Self::About => "/about",
            Self::Chat => "/chat",
            Self::Tasks => "/tasks",
            Self::Mandates => "/mandates",
            Self::NotFound => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Route::resolve("/"), Route::Calendar);
        assert_eq!(Route::resolve("/tasks/"), Route::Tasks);
        assert_eq!(Route::resolve("/mandates?tab=mine"), Route::Mandates);
        assert_eq!(Route::resolve("/chat"), Route::Chat);
        assert_eq!(Route::resolve("/about"), Route::About);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::resolve("/settings"), Route::NotFound);
        assert_eq!(Route::resolve("tasks"), Route::NotFound);
        assert_eq!(Route::Tasks.path(), "/tasks");
    }
}
