//! Link → URL string.
//!
//! # Responsibilities
//! - Render the path below the target mount, with context path and sub-path
//! - Decide between a relative and a fully-qualified URL
//! - Apply the render-host override
//!
//! # Design Decisions
//! - A render-host override never produces a fully-qualified URL
//! - Default ports are dropped by `url`, never by string matching
//! - A port-0 target reuses the requesting port on the same host

use url::Url;

use crate::linking::context::RequestContext;
use crate::linking::link::HstLink;

impl HstLink<'_> {
    /// Serialize against the requesting context. `external` forces a
    /// fully-qualified URL.
    pub fn to_url_form(&self, ctx: &RequestContext<'_>, external: bool) -> String {
        let links = ctx.model().link_config();
        let target = self.mount();
        let requesting = ctx.mount();

        let mut path = self.path().to_string();
        match self.sub_path() {
            Some(sub_path) => {
                path.push_str(&links.sub_path_delimiter);
                path.push_str(sub_path);
            }
            None if !target.is_site()
                && !self.is_container_resource()
                && links.is_excluded(&format!("/{}", path)) =>
            {
                path.push_str(&links.sub_path_delimiter);
            }
            None => {}
        }

        let rendered = render_path(self, ctx, &path);

        if let Some(render_host) = ctx.render_host() {
            if self.is_container_resource() {
                return rendered;
            }
            let separator = if rendered.contains('?') { '&' } else { '?' };
            return format!(
                "{}{}{}={}",
                rendered, separator, links.render_host_parameter, render_host
            );
        }

        let same_host = target.virtual_host() == requesting.virtual_host();
        let port = match target.port() {
            0 if same_host => ctx.port(),
            port => port,
        };
        let port_differs = target.show_port() && port != 0 && port != ctx.port();
        let scheme_differs = target.has_explicit_scheme() && target.scheme() != ctx.scheme();

        if !(external || ctx.fully_qualified_urls() || !same_host || port_differs || scheme_differs) {
            return rendered;
        }

        let scheme = if target.has_explicit_scheme() || !same_host {
            target.scheme()
        } else {
            ctx.scheme()
        };
        let host = if same_host || target.virtual_host().host_name().contains('*') {
            ctx.host_name()
        } else {
            target.virtual_host().host_name()
        };
        let port = target.show_port().then_some(port).filter(|p| *p != 0);

        match origin(scheme, host, port) {
            Some(origin) => format!("{}{}", origin, rendered),
            None => {
                tracing::warn!(scheme = %scheme, host = %host, "Cannot qualify link; rendering relative");
                rendered
            }
        }
    }
}

/// Context path (when shown) + mount path + link path.
fn render_path(link: &HstLink<'_>, ctx: &RequestContext<'_>, path: &str) -> String {
    let mount = link.mount();
    let context_path = if mount.show_context_path() {
        mount.only_for_context_path().unwrap_or(ctx.context_path())
    } else {
        ""
    };

    let mut rendered = context_path.trim_end_matches('/').to_string();
    rendered.push_str(mount.mount_path());
    if !path.is_empty() {
        rendered.push('/');
        rendered.push_str(path);
    }
    if rendered.is_empty() {
        rendered.push('/');
    }
    rendered
}

/// "scheme://host[:port]" without trailing slash; default ports are omitted.
fn origin(scheme: &str, host: &str, port: Option<u16>) -> Option<String> {
    let mut url = Url::parse(&format!("{}://{}", scheme, host)).ok()?;
    if port.is_some() {
        url.set_port(port).ok()?;
    }
    Some(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::hosting::HostModel;

    const MODEL: &str = r#"
        [links]
        excluded_suffixes = [".css"]

        [[host_groups]]
        name = "prod"

        [[host_groups.hosts]]
        name = "www.example.com"

        [host_groups.hosts.mount]
        mount_point = "/sites/example"

        [[host_groups.hosts.mount.children]]
        name = "preview"
        type = "preview"

        [[host_groups.hosts.mount.children]]
        name = "secure"
        scheme = "https"

        [[host_groups.hosts.mount.children]]
        name = "cms"
        only_for_context_path = "/cms"

        [[host_groups.hosts.mount.children]]
        name = "bare"
        show_context_path = false

        [[host_groups.hosts]]
        name = "shop.example.com"
        scheme = "https"

        [host_groups.hosts.mount]
        mount_point = "/sites/shop"

        [[host_groups.hosts.ports]]
        port = 443

        [host_groups.hosts.ports.mount]
        mount_point = "/sites/shop"

        [[host_groups.hosts]]
        name = "admin.example.com"

        [[host_groups.hosts.ports]]
        port = 8443

        [host_groups.hosts.ports.mount]
        mount_point = "/sites/admin"

        [[host_groups.hosts]]
        name = "*.pages.example.com"

        [host_groups.hosts.mount]
        mount_point = "/sites/pages"
    "#;

    fn model() -> HostModel {
        let config: RouterConfig = toml::from_str(MODEL).unwrap();
        HostModel::from_config(&config).unwrap()
    }

    fn context<'m>(model: &'m HostModel, host: &str) -> RequestContext<'m> {
        RequestContext::new(model.match_mount(host, "", "/").unwrap().unwrap())
    }

    fn root_of<'m>(model: &'m HostModel, host: &str, port: u16) -> crate::hosting::Mount<'m> {
        model
            .find_virtual_host(host)
            .unwrap()
            .port_mount(port)
            .unwrap()
            .root_mount()
    }

    #[test]
    fn test_same_mount_is_relative() {
        let model = model();
        let ctx = context(&model, "www.example.com");

        let link = HstLink::for_path(ctx.mount(), "/news/sports/");
        assert_eq!(link.to_url_form(&ctx, false), "/news/sports");
        assert_eq!(HstLink::for_path(ctx.mount(), "").to_url_form(&ctx, false), "/");

        let preview = ctx.mount().child("preview").unwrap();
        assert_eq!(
            HstLink::for_path(preview, "news").to_url_form(&ctx, false),
            "/preview/news"
        );
        assert_eq!(HstLink::for_path(preview, "").to_url_form(&ctx, false), "/preview");
    }

    #[test]
    fn test_external_and_fully_qualified_mode() {
        let model = model();
        let ctx = context(&model, "www.example.com:8080");
        let link = HstLink::for_path(ctx.mount(), "news");

        assert_eq!(link.to_url_form(&ctx, true), "http://www.example.com:8080/news");

        let ctx = context(&model, "www.example.com").with_fully_qualified_urls(true);
        assert_eq!(link.to_url_form(&ctx, false), "http://www.example.com/news");
    }

    #[test]
    fn test_cross_host_is_fully_qualified_without_default_port() {
        let model = model();
        let ctx = context(&model, "www.example.com");

        let shop = root_of(&model, "shop.example.com", 443);
        assert_eq!(
            HstLink::for_path(shop, "cart").to_url_form(&ctx, false),
            "https://shop.example.com/cart"
        );

        let any_port = root_of(&model, "shop.example.com", 0);
        assert_eq!(
            HstLink::for_path(any_port, "cart").to_url_form(&ctx, false),
            "https://shop.example.com/cart"
        );

        let admin = root_of(&model, "admin.example.com", 8443);
        assert_eq!(
            HstLink::for_path(admin, "").to_url_form(&ctx, false),
            "http://admin.example.com:8443/"
        );
    }

    #[test]
    fn test_explicit_scheme_change_qualifies() {
        let model = model();
        let ctx = context(&model, "www.example.com");
        let secure = ctx.mount().child("secure").unwrap();

        assert_eq!(
            HstLink::for_path(secure, "login").to_url_form(&ctx, false),
            "https://www.example.com/secure/login"
        );

        let ctx = ctx.with_scheme("HTTPS");
        assert_eq!(
            HstLink::for_path(secure, "login").to_url_form(&ctx, false),
            "/secure/login"
        );
    }

    #[test]
    fn test_wildcard_host_uses_requested_name() {
        let model = model();
        let ctx = context(&model, "blog.pages.example.com");

        assert_eq!(
            HstLink::for_path(ctx.mount(), "post").to_url_form(&ctx, true),
            "http://blog.pages.example.com/post"
        );

        let www = context(&model, "www.example.com");
        assert_eq!(
            HstLink::for_path(ctx.mount(), "post").to_url_form(&www, false),
            "http://www.example.com/post"
        );
    }

    #[test]
    fn test_context_path() {
        let model = model();
        let ctx = RequestContext::new(
            model
                .match_mount("www.example.com", "/site", "/")
                .unwrap()
                .unwrap(),
        )
        .with_context_path("/site/");

        let root = ctx.mount();
        assert_eq!(HstLink::for_path(root, "a").to_url_form(&ctx, false), "/site/a");

        let cms = root.child("cms").unwrap();
        assert_eq!(HstLink::for_path(cms, "a").to_url_form(&ctx, false), "/cms/cms/a");

        let bare = root.child("bare").unwrap();
        assert_eq!(HstLink::for_path(bare, "a").to_url_form(&ctx, false), "/bare/a");
    }

    #[test]
    fn test_sub_path_and_exclusions() {
        let model = model();
        let ctx = context(&model, "www.example.com");
        let root = ctx.mount();

        assert_eq!(
            HstLink::for_path(root, "news")
                .with_sub_path("print")
                .to_url_form(&ctx, false),
            "/news./print"
        );
        assert_eq!(
            HstLink::for_path(root, "news").with_sub_path("").to_url_form(&ctx, false),
            "/news./"
        );
        assert_eq!(
            HstLink::for_path(root, "theme.css").to_url_form(&ctx, false),
            "/theme.css./"
        );
        assert_eq!(
            HstLink::for_path(root, "theme.css")
                .as_container_resource()
                .to_url_form(&ctx, false),
            "/theme.css"
        );
    }

    #[test]
    fn test_site_mount_gets_no_bare_delimiter() {
        let config: RouterConfig = toml::from_str(&format!(
            "{MODEL}\n[[sites]]\nmount_point = \"/sites/example\"\ncontent_path = \"/content/example\"\n"
        ))
        .unwrap();
        let model = HostModel::from_config(&config).unwrap();
        let ctx = context(&model, "www.example.com");
        let root = ctx.mount();
        assert!(root.is_site());

        assert_eq!(
            HstLink::for_path(root, "theme.css").to_url_form(&ctx, false),
            "/theme.css"
        );
        assert_eq!(
            HstLink::for_path(root, "theme.css")
                .with_sub_path("print")
                .to_url_form(&ctx, false),
            "/theme.css./print"
        );
    }

    #[test]
    fn test_render_host_override() {
        let model = model();
        let ctx = context(&model, "www.example.com").with_render_host("shop.example.com");

        let shop = root_of(&model, "shop.example.com", 443);
        assert_eq!(
            HstLink::for_path(shop, "cart").to_url_form(&ctx, true),
            "/cart?render_host=shop.example.com"
        );
        assert_eq!(
            HstLink::for_path(ctx.mount(), "news")
                .as_container_resource()
                .to_url_form(&ctx, false),
            "/news"
        );
        assert_eq!(
            HstLink::for_path(ctx.mount(), "search?q=x").to_url_form(&ctx, false),
            "/search?q=x&render_host=shop.example.com"
        );
    }
}
