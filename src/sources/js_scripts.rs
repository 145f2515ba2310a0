//! JavaScript evaluation scripts
//!
//! Scripts only collect raw strings from the DOM. Filtering and string
//! surgery happen on the Rust side so they can be unit tested.

/// PBS timeline: article links
pub const PBS_LISTING_SCRIPT: &str = r#"
    (() => Array.from(document.querySelectorAll("a.card-timeline__title")).map(a => a.href))()
"#;

/// PBS post: either a broadcast transcript or a written article
pub const PBS_DETAIL_SCRIPT: &str = r#"
    (() => {
        if (document.getElementById("transcript") !== null) {
            const lead = document.querySelector("div#transcript p");
            const title = document.querySelector("title");
            return {
                kind: "transcript",
                text: lead ? lead.innerText : null,
                title: title ? title.innerText : null
            };
        }
        const paragraphs = Array.from(document.querySelectorAll("div.body-text > p"))
            .map(p => p.innerText);
        return { kind: "article", paragraphs: paragraphs };
    })()
"#;

/// NPR news section: article links and their section slugs, index-aligned
pub const NPR_LISTING_SCRIPT: &str = r#"
    (() => ({
        articles: Array.from(document.querySelectorAll("h2.title > a"))
            .slice(0, 10)
            .map(a => a.href),
        sections: Array.from(document.querySelectorAll("div.slug-wrap > h3.slug > a"))
            .slice(0, 10)
            .map(a => a.href)
    }))()
"#;

/// NPR story: body paragraphs and bold section headers
pub const NPR_DETAIL_SCRIPT: &str = r#"
    (() => ({
        paragraphs: Array.from(document.querySelectorAll("div#storytext > p"))
            .map(p => p.innerText),
        headers: Array.from(document.querySelectorAll("div#storytext > p > strong"))
            .map(s => s.innerText)
    }))()
"#;

/// UPI top news: inline summary leads, their row links, and featured links
pub const UPI_LISTING_SCRIPT: &str = r#"
    (() => ({
        summaries: Array.from(document.querySelectorAll("div.content"))
            .slice(0, 7)
            .map(d => d.innerText),
        rows: Array.from(document.querySelectorAll("a.row"))
            .slice(0, 7)
            .map(a => ({ title: a.title || "", href: a.href })),
        featured: Array.from(document.querySelectorAll("a.col-md-4.col-sm-4"))
            .map(a => ({ title: a.title || "", href: a.href }))
    }))()
"#;

/// UPI story: lead paragraph
pub const UPI_DETAIL_SCRIPT: &str = r#"
    (() => {
        const lead = document.querySelector("article > p");
        return lead ? lead.innerText : null;
    })()
"#;
