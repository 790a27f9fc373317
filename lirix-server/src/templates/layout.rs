use maud::{DOCTYPE, Markup, html};

use crate::templates::components::navbar;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CurrentPage {
    Overview,
    Detail,
    About,
    Help,
}

pub fn base(title: &str, current_page: CurrentPage, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.4/css/bulma.min.css";
            }
            body {
                section class="section" {
                    div class="container" {
                        nav class="level mb-4" {
                            div class="level-left" {
                                a href="/" class="has-text-current" style="text-decoration: none;" {
                                    h1 class="title level-item" { "Lirix" }
                                }
                            }
                            div class="level-right" {
                                p class="level-item is-size-7 has-text-grey" {
                                    "Weather data by "
                                    a href="https://openweathermap.org" target="_blank" { "OpenWeatherMap" }
                                }
                            }
                        }

                        (navbar(current_page))

                        div id="main-content" {
                            (content)
                        }
                    }
                }
            }
        }
    }
}
