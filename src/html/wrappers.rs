use maud::DOCTYPE;

use super::*;

/// Wrap `body` in a full document.
pub(super) fn universal(body: Markup, headers: &HeaderMap, title: &str) -> Markup {
    let dark_theme = match get_cookie(headers, "conduit_theme") {
        Some("dark") => Some("dark-theme"),
        _ => None,
    };

    html! {
        (DOCTYPE)
        html lang="en-us" {
            head {
                title { (title) " | Conduit" }
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link type="text/css" rel="stylesheet" href="//demo.productionready.io/main.css";
                link type="text/css" rel="stylesheet" href="//code.ionicframework.com/ionicons/2.0.1/css/ionicons.min.css";
            }
            body class=[dark_theme] {
                nav.navbar.navbar-light {
                    .container {
                        a.navbar-brand href="/" { "conduit" }
                    }
                }
                .container.page {
                    (body)
                }
            }
        }
    }
}
