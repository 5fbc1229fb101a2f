use percent_encoding::percent_decode_str;

const OPERATOR_PREFIX: &str = "operator/";

/// Outcome of matching a navigation path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// The site root; callers redirect to their default operator.
    Root,
    /// `operator/<identifier>`, decoded.
    Operator(String),
    /// Anything else. Renders the empty state.
    Unmatched,
}

impl Route {
    /// Resolve to the identifier to display, substituting `default` for the root.
    pub fn identifier<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        match self {
            Route::Root => Some(default),
            Route::Operator(identifier) => Some(identifier),
            Route::Unmatched => None,
        }
    }
}

/// Match a path such as `/operator/forkJoin`. The leading slash is optional
/// and a single trailing slash is ignored; query strings and fragments are dropped.
pub fn parse_route(path: &str) -> Route {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.is_empty() {
        return Route::Root;
    }

    match path.strip_prefix(OPERATOR_PREFIX) {
        Some(segment) if !segment.is_empty() && !segment.contains('/') => {
            let identifier = percent_decode_str(segment).decode_utf8_lossy();
            Route::Operator(identifier.into_owned())
        }
        _ => Route::Unmatched,
    }
}

/// Path under which `identifier` is served.
pub fn operator_path(identifier: &str) -> String {
    format!("/{OPERATOR_PREFIX}{}", encode_segment(identifier))
}

/// Percent-encode `identifier` for use as a single path segment.
pub fn encode_segment(identifier: &str) -> String {
    percent_encoding::utf8_percent_encode(identifier, SEGMENT).to_string()
}

const SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');
