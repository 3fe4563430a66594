use dioxus::prelude::*;

use crate::dashboard::BenchmarkDashboard;

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        section { class: "page page-dashboard",
            h1 { {crate::t!("dashboard-title")} }
            p { {crate::t!("dashboard-intro")} }
            BenchmarkDashboard {}
        }
    }
}
