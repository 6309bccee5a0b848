use crate::directory::models::User;

/// Columns the directory view can search over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Email,
}

impl SearchField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(SearchField::Name),
            "email" => Some(SearchField::Email),
            _ => None,
        }
    }

    /// Default column selection, same as the view's multiselect default.
    pub fn all() -> Vec<SearchField> {
        vec![SearchField::Name, SearchField::Email]
    }

    fn value<'a>(&self, user: &'a User) -> &'a str {
        match self {
            SearchField::Name => &user.name,
            SearchField::Email => &user.email,
        }
    }
}

/// Parses a comma-separated column list ("name,email"). Unknown names are
/// dropped; an empty or missing parameter means the default selection.
pub fn parse_fields(raw: Option<&str>) -> Vec<SearchField> {
    match raw {
        None => SearchField::all(),
        Some(csv) if csv.trim().is_empty() => SearchField::all(),
        Some(csv) => csv.split(',').filter_map(SearchField::parse).collect(),
    }
}

/// Case-insensitive literal substring match against the selected columns.
/// A row matches when any selected column contains the needle; with no
/// columns selected nothing matches.
pub fn matches(user: &User, needle: &str, fields: &[SearchField]) -> bool {
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|field| field.value(user).to_lowercase().contains(&needle))
}

/// Filters without reordering.
pub fn filter<'a>(users: &'a [User], needle: &str, fields: &[SearchField]) -> Vec<&'a User> {
    users
        .iter()
        .filter(|user| matches(user, needle, fields))
        .collect()
}
