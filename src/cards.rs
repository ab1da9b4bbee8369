//! Card markup shared by tag pages and section index pages.
//!
//! A card is a `<MetaCard>` component linking to one content page, with the
//! page's cover as a thumbnail when it has one:
//!
//! ```text
//! <div class="tags-container">
//!
//! <MetaCard link="/snippets/git.html"><img src="/images/git.png"> </MetaCard>
//!
//! <MetaCard link="/snippets/shell.html"></MetaCard>
//!
//! </div>
//! ```
//!
//! Markup is built with maud so links and cover paths are attribute-escaped.

use crate::naming;
use crate::scan::ContentFile;
use maud::html;

/// Stable sort putting covered items first.
///
/// Items with equal cover status keep their input order; there is no
/// secondary key.
pub fn sort_cover_first<T>(items: &mut [T], has_cover: impl Fn(&T) -> bool) {
    items.sort_by_key(|item| !has_cover(item));
}

/// One card for a content file.
pub fn render_card(file: &ContentFile) -> String {
    let link = naming::page_link(&file.path);
    let cover = file.frontmatter.cover.as_deref();
    html! {
        MetaCard link=(link) {
            @if let Some(cover) = cover {
                img src=(cover);
                " "
            }
        }
    }
    .into_string()
}

/// A `tags-container` div holding one card per file, in the given order.
pub fn render_card_list(files: &[&ContentFile]) -> String {
    let mut out = String::from("<div class=\"tags-container\">\n\n");
    for file in files {
        out.push_str(&render_card(file));
        out.push_str("\n\n");
    }
    out.push_str("</div>\n");
    out
}

/// Entry on the tag directory page.
pub fn render_tag_chip(tag: &str) -> String {
    html! { Tag name=(tag) {} }.into_string()
}
