//! Embedded Tera templates
//!
//! Templates are compiled into the binary and registered under their file
//! names; `.html` templates are autoescaped.

use axum::response::Html;
use tera::{Context, Tera};

use super::error::ApiError;
use crate::auth::CurrentUser;
use crate::config::SecurityConfig;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("proverbs.html", include_str!("../../templates/proverbs.html")),
    (
        "change_password.html",
        include_str!("../../templates/change_password.html"),
    ),
];

/// Compile every embedded template.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

/// Context with the values the layout needs.
pub fn base_context(security: &SecurityConfig, user: Option<&CurrentUser>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("registerable", &security.registerable);
    ctx.insert("changeable", &security.changeable);
    if let Some(user) = user {
        ctx.insert("user", user);
    }
    ctx
}

pub fn render(tera: &Tera, name: &str, ctx: &Context) -> Result<Html<String>, ApiError> {
    Ok(Html(tera.render(name, ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn security() -> SecurityConfig {
        AppConfig::from_lookup(|_| None).unwrap().security
    }

    #[test]
    fn all_templates_compile() {
        let tera = load().unwrap();
        let names: Vec<_> = tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(name), "{} missing", name);
        }
    }

    #[test]
    fn login_page_escapes_input() {
        let tera = load().unwrap();
        let mut ctx = base_context(&security(), None);
        ctx.insert("next", "/home");
        ctx.insert("login", "<script>");
        ctx.insert("error", &Option::<String>::None);
        ctx.insert("notice", &Option::<String>::None);

        let html = tera.render("login.html", &ctx).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"href="/register""#));
    }

    #[test]
    fn home_shows_user() {
        let tera = load().unwrap();
        let user = CurrentUser {
            id: 1,
            username: "agur".into(),
            email: "agur@example.com".into(),
            roles: vec!["admin".into()],
        };
        let ctx = base_context(&security(), Some(&user));

        let html = tera.render("home.html", &ctx).unwrap();
        assert!(html.contains("Welcome, agur"));
        assert!(html.contains("Roles: admin"));
        assert!(html.contains("Log out"));
    }
}
