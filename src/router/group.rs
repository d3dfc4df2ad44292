//! Prefix and middleware inheritance for nested `group()` calls.

/// Attributes passed to [`Router::group`](super::Router::group).
#[derive(Debug, Clone, Default)]
pub struct GroupAttributes {
    prefix: Option<String>,
    middleware: Vec<String>,
}

impl GroupAttributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn middleware<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// One active group: everything a route registered inside it inherits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupContext {
    pub prefix: String,
    pub middleware: Vec<String>,
}

/// Stack of active groups, owned by the router instance.
#[derive(Debug, Default)]
pub struct GroupStack {
    frames: Vec<GroupContext>,
}

impl GroupStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost active group.
    #[must_use]
    pub fn current(&self) -> Option<&GroupContext> {
        self.frames.last()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a group nested inside the current one.
    pub fn push(&mut self, attributes: &GroupAttributes) -> &GroupContext {
        let (parent_prefix, parent_middleware) = match self.current() {
            Some(ctx) => (ctx.prefix.as_str(), ctx.middleware.as_slice()),
            None => ("", &[][..]),
        };
        let frame = GroupContext {
            prefix: join_paths(parent_prefix, attributes.prefix.as_deref().unwrap_or("")),
            middleware: parent_middleware
                .iter()
                .chain(&attributes.middleware)
                .cloned()
                .collect(),
        };
        self.frames.push(frame);
        &self.frames[self.frames.len() - 1]
    }

    pub fn pop(&mut self) -> Option<GroupContext> {
        self.frames.pop()
    }

    /// Effective template for `path` registered in the current group.
    #[must_use]
    pub fn apply(&self, path: &str) -> String {
        join_paths(self.current().map_or("", |ctx| ctx.prefix.as_str()), path)
    }

    /// Middleware every route in the current group starts with.
    #[must_use]
    pub fn inherited_middleware(&self) -> &[String] {
        self.current().map_or(&[][..], |ctx| ctx.middleware.as_slice())
    }
}

/// Join path pieces with exactly one `/` between them and a single leading `/`.
#[must_use]
pub fn join_paths(base: &str, path: &str) -> String {
    let pieces: Vec<&str> = [base, path]
        .into_iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect();
    format!("/{}", pieces.join("/"))
}
