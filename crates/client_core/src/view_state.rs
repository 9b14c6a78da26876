//! View state (search, pagination window, sort) and its URL query projection.

use std::fmt;

use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: usize = 25;

const PARAM_SEARCH: &str = "search";
const PARAM_PAGE: &str = "page";
const PARAM_PAGE_SIZE: &str = "pageSize";
const PARAM_SORT_ACTIVE: &str = "sortActive";
const PARAM_SORT_DIRECTION: &str = "sortDirection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub page_index: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl ViewState {
    /// Builds a view state from a URL query string (with or without the
    /// leading `?`). Unparseable values fall back to their defaults.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();
        let mut sort_field = None;
        let mut sort_direction = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                PARAM_SEARCH => state.search = value.into_owned(),
                PARAM_PAGE => {
                    if let Ok(page) = value.trim().parse::<usize>() {
                        state.page_index = page;
                    }
                }
                PARAM_PAGE_SIZE => {
                    if let Ok(size) = value.trim().parse::<usize>() {
                        if size > 0 {
                            state.page_size = size;
                        }
                    }
                }
                PARAM_SORT_ACTIVE => {
                    let field = value.trim();
                    if !field.is_empty() {
                        sort_field = Some(field.to_string());
                    }
                }
                PARAM_SORT_DIRECTION => sort_direction = SortDirection::parse(value.trim()),
                _ => {}
            }
        }

        if let (Some(field), Some(direction)) = (sort_field, sort_direction) {
            state.sort = Some(SortState { field, direction });
        }
        state
    }

    /// Query string carrying only the parameters that differ from the
    /// defaults. Empty when the state is at its defaults.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        let search = self.search.trim();
        if !search.is_empty() {
            query.append_pair(PARAM_SEARCH, search);
        }
        if self.page_index != 0 {
            query.append_pair(PARAM_PAGE, &self.page_index.to_string());
        }
        if self.page_size != DEFAULT_PAGE_SIZE {
            query.append_pair(PARAM_PAGE_SIZE, &self.page_size.to_string());
        }
        if let Some(sort) = &self.sort {
            query.append_pair(PARAM_SORT_ACTIVE, &sort.field);
            query.append_pair(PARAM_SORT_DIRECTION, sort.direction.as_str());
        }

        query.finish()
    }
}
