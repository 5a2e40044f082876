use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;

use crate::views::{CatalogView, TestStartView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/tests/:test_id", TestStartView)] TestStart { test_id: String },
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    use_hook(move || {
        if let Some(test_id) = ctx.take_initial_test() {
            let _ = navigator.push(Route::TestStart {
                test_id: test_id.as_str().to_owned(),
            });
        }
    });

    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "topbar__brand", to: Route::Catalog {}, "VECTOR" }
                span { class: "topbar__section", "Mock Tests" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
