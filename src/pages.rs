//! Page collaborators of the library client.
//!
//! Each page renders an HTML shell from the matched path parameters and the
//! session's auth state. Pages know nothing about how they were routed.

use crate::{
    auth::AuthState,
    navigation::{PathParams, encode_segment},
};

/// Everything a page may read while rendering.
pub struct PageContext<'a> {
    pub params: &'a PathParams,
    pub auth: &'a AuthState,
    /// Base path the client is served under, empty for `/`.
    pub base_path: &'a str,
}

impl PageContext<'_> {
    /// Prefixes an application path with the base path.
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base_path, path)
    }
}

/// Page
///
/// A renderable page. Implementations must be cheap to share between
/// requests; the route table holds them behind an `Arc`.
pub trait Page: Send + Sync {
    fn title(&self) -> &'static str;

    fn render(&self, ctx: &PageContext<'_>) -> String;
}

pub struct LoginPage;
pub struct DashboardPage;
pub struct BookListPage;
pub struct BookDetailPage;
pub struct BorrowFormPage;
pub struct NotFoundPage;

impl Page for LoginPage {
    fn title(&self) -> &'static str {
        "Sign in"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let body = match ctx.auth.user() {
            // The login page stays reachable for signed-in users.
            Some(user) => format!(
                r#"<p class="signed-in">Signed in as {}.</p><a href="{}">Go to dashboard</a>"#,
                escape(&user.id.to_string()),
                escape(&ctx.href("/dashboard")),
            ),
            None => r#"<form id="login-form" method="post">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>"#
                .to_string(),
        };
        document(self.title(), &body)
    }
}

impl Page for DashboardPage {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let role = ctx.auth.user().map(|u| u.role.as_str()).unwrap_or("guest");
        let body = format!(
            r#"<p class="welcome">Welcome back ({}).</p><nav><a href="{}">Browse books</a></nav>"#,
            escape(role),
            escape(&ctx.href("/books")),
        );
        document(self.title(), &body)
    }
}

impl Page for BookListPage {
    fn title(&self) -> &'static str {
        "Books"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let body = format!(
            r#"<section id="book-list" data-detail-href="{}"></section>"#,
            escape(&ctx.href("/books/")),
        );
        document(self.title(), &body)
    }
}

impl Page for BookDetailPage {
    fn title(&self) -> &'static str {
        "Book details"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let id = ctx.params.get("id").unwrap_or_default();
        let body = format!(
            r#"<article id="book-detail" data-book-id="{id}"></article><a href="{borrow}">Borrow this book</a>"#,
            id = escape(id),
            borrow = escape(&ctx.href(&format!("/borrow/{}", encode_segment(id)))),
        );
        document(self.title(), &body)
    }
}

impl Page for BorrowFormPage {
    fn title(&self) -> &'static str {
        "Borrow a book"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let id = ctx.params.get("id").unwrap_or_default();
        let body = format!(
            r#"<form id="borrow-form" method="post">
<input type="hidden" name="book_id" value="{}">
<button type="submit">Confirm borrowing</button>
</form>"#,
            escape(id),
        );
        document(self.title(), &body)
    }
}

impl Page for NotFoundPage {
    fn title(&self) -> &'static str {
        "Page not found"
    }

    fn render(&self, ctx: &PageContext<'_>) -> String {
        let body = format!(
            r#"<p class="not-found">Nothing lives at this address.</p><a href="{}">Back to the dashboard</a>"#,
            escape(&ctx.href("/dashboard")),
        );
        document(self.title(), &body)
    }
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} | Library</title></head>\n<body>\n<main>\n<h1>{}</h1>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        escape(title),
        body
    )
}

/// Minimal HTML escaping for text and attribute values.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
