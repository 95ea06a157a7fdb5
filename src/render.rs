//! Server-side HTML for the portfolio page.

use crate::content::PortfolioContent;
use crate::models::Snapshot;
use crate::types::GitHubRepo;
use crate::view::{LanguageFilter, PageView, SortKey, ViewState};
use std::fmt::Write;
use url::form_urlencoded;

pub const EMPTY_PROJECTS_MESSAGE: &str = "No repositories found or API error.";

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#0b1120;color:#e2e8f0}\
a{color:#60a5fa;text-decoration:none}\
nav{position:sticky;top:0;display:flex;justify-content:space-between;padding:1rem 2rem;background:#020617e6;border-bottom:1px solid #1e293b}\
nav .links a{margin-left:1.5rem;color:#cbd5e1}\
section{max-width:72rem;margin:0 auto;padding:4rem 1.5rem}\
h1,h2{text-align:center}\
.stats,.grid,.skills{display:grid;gap:1rem;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr))}\
.card{background:#0f172acc;border:1px solid #1e293b;border-radius:1rem;padding:1.25rem}\
.stat-value{font-size:2rem;font-weight:700}\
.badge{display:inline-block;padding:.2rem .6rem;margin:.2rem;border:1px solid #334155;border-radius:999px;font-size:.8rem}\
.bar{height:.5rem;background:#1e293b;border-radius:999px;overflow:hidden}\
.bar span{display:block;height:100%;background:linear-gradient(90deg,#3b82f6,#a855f7)}\
.pager{display:flex;justify-content:center;gap:1rem;margin-top:2rem}\
.empty{text-align:center;color:#94a3b8;padding:4rem 0}\
form.controls{display:flex;flex-wrap:wrap;gap:.5rem;justify-content:center;margin-bottom:2rem}\
footer{text-align:center;color:#94a3b8;padding:2rem;border-top:1px solid #1e293b}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Query string reproducing `state` at `page`. Defaults are left out.
pub fn page_query(state: &ViewState, page: usize) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !state.search.is_empty() {
        query.append_pair("q", &state.search);
    }
    if let LanguageFilter::Only(language) = &state.language {
        query.append_pair("language", language);
    }
    if state.sort != SortKey::default() {
        query.append_pair("sort", state.sort.as_str());
    }
    if page != 1 {
        query.append_pair("page", &page.to_string());
    }
    query.finish()
}

fn page_href(state: &ViewState, page: usize) -> String {
    let query = page_query(state, page);
    if query.is_empty() {
        "/#projects".to_string()
    } else {
        format!("/?{}#projects", query)
    }
}

pub fn render_page(snapshot: &Snapshot, content: &PortfolioContent, view: &PageView<'_>) -> String {
    let identity = snapshot.identity.as_ref();
    let name = identity
        .and_then(|user| user.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(content.fallback_name.as_str());

    let mut html = String::with_capacity(16 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{name}</title><style>{STYLE}</style></head><body>",
        name = escape_html(name),
    );

    let _ = write!(
        html,
        "<nav><strong>{}</strong><div class=\"links\">\
         <a href=\"#about\">About</a><a href=\"#projects\">Projects</a>\
         <a href=\"#skills\">Skills</a><a href=\"#contact\">Contact</a></div></nav>",
        escape_html(name)
    );

    render_hero(&mut html, snapshot, content, name);
    render_about(&mut html, snapshot, content);
    render_projects(&mut html, view);
    render_skills(&mut html, content);
    render_contact(&mut html, snapshot, content);

    let _ = write!(
        html,
        "<footer>&copy; {} {}. Data fetched {}.</footer></body></html>",
        snapshot.fetched_at.format("%Y"),
        escape_html(name),
        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC"),
    );

    html
}

fn contact_email<'a>(snapshot: &'a Snapshot, content: &'a PortfolioContent) -> Option<&'a str> {
    snapshot
        .identity
        .as_ref()
        .and_then(|user| user.email.as_deref())
        .or(content.fallback_email.as_deref())
}

fn profile_url<'a>(snapshot: &'a Snapshot, content: &'a PortfolioContent) -> Option<&'a str> {
    snapshot
        .identity
        .as_ref()
        .map(|user| user.html_url.as_str())
        .or(content.fallback_profile_url.as_deref())
}

fn render_hero(html: &mut String, snapshot: &Snapshot, content: &PortfolioContent, name: &str) {
    let identity = snapshot.identity.as_ref();
    let bio = identity
        .and_then(|user| user.bio.as_deref())
        .filter(|bio| !bio.trim().is_empty())
        .unwrap_or(content.fallback_bio.as_str());

    let _ = write!(
        html,
        "<section id=\"hero\"><h1>{}</h1><p style=\"text-align:center\">{}</p>\
         <p style=\"text-align:center;color:#94a3b8\">{}</p>",
        escape_html(name),
        escape_html(&content.headline),
        escape_html(bio),
    );

    html.push_str("<p style=\"text-align:center;color:#94a3b8\">");
    if let Some(location) = identity.and_then(|user| user.location.as_deref()) {
        let _ = write!(html, "<span>{}</span> ", escape_html(location));
    }
    if let Some(email) = contact_email(snapshot, content) {
        let _ = write!(html, "<span>{}</span>", escape_html(email));
    }
    html.push_str("</p>");

    let stats = [
        ("Repositories", identity.map(|u| u.public_repos as u64).unwrap_or(0)),
        ("Followers", identity.map(|u| u.followers as u64).unwrap_or(0)),
        ("Total Commits", snapshot.total_commits),
        ("Following", identity.map(|u| u.following as u64).unwrap_or(0)),
    ];
    html.push_str("<div class=\"stats\">");
    for (label, value) in stats {
        let _ = write!(
            html,
            "<div class=\"card\"><div class=\"stat-value\">{}</div><div>{}</div></div>",
            value, label
        );
    }
    html.push_str("</div>");

    html.push_str("<p style=\"text-align:center;margin-top:2rem\">");
    if let Some(resume) = &content.resume_url {
        let _ = write!(html, "<a class=\"badge\" href=\"{}\" download>Download Resume</a> ", escape_html(resume));
    }
    html.push_str("<a class=\"badge\" href=\"#projects\">View Projects</a>");
    if let Some(url) = profile_url(snapshot, content) {
        let _ = write!(html, " <a class=\"badge\" href=\"{}\" rel=\"noopener noreferrer\">GitHub</a>", escape_html(url));
    }
    for link in &content.social_links {
        let _ = write!(
            html,
            " <a class=\"badge\" href=\"{}\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(&link.url),
            escape_html(&link.label)
        );
    }
    html.push_str("</p></section>");
}

fn render_about(html: &mut String, snapshot: &Snapshot, content: &PortfolioContent) {
    html.push_str("<section id=\"about\"><h2>About Me</h2>");
    for paragraph in &content.about {
        let _ = write!(html, "<p>{}</p>", escape_html(paragraph));
    }

    if !content.technologies.is_empty() {
        html.push_str("<div>");
        for tech in &content.technologies {
            let _ = write!(html, "<span class=\"badge\">{}</span>", escape_html(tech));
        }
        html.push_str("</div>");
    }

    for proficiency in &content.proficiencies {
        let percentage = proficiency.percentage.min(100);
        let _ = write!(
            html,
            "<p>{} <strong>{}%</strong></p><div class=\"bar\"><span style=\"width:{}%\"></span></div>",
            escape_html(&proficiency.skill),
            percentage,
            percentage
        );
    }

    let shares = snapshot.language_totals.shares();
    if !shares.is_empty() {
        html.push_str("<h3>Languages across repositories</h3>");
        for share in &shares {
            let _ = write!(
                html,
                "<p>{} <strong>{:.1}%</strong></p><div class=\"bar\"><span style=\"width:{:.1}%\"></span></div>",
                escape_html(&share.language),
                share.percentage,
                share.percentage
            );
        }
    }
    html.push_str("</section>");
}

fn render_controls(html: &mut String, view: &PageView<'_>) {
    let state = &view.state;
    let _ = write!(
        html,
        "<form class=\"controls\" method=\"get\" action=\"/#projects\">\
         <input type=\"search\" name=\"q\" placeholder=\"Search repositories\" value=\"{}\">\
         <select name=\"language\"><option value=\"All\">All</option>",
        escape_html(&state.search)
    );
    for language in &view.languages {
        let selected = if state.language.label() == language.as_str() { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape_html(language),
            selected
        );
    }
    html.push_str("</select><select name=\"sort\">");
    for key in SortKey::all() {
        let label = match key {
            SortKey::Updated => "Recently updated",
            SortKey::Stars => "Most stars",
            SortKey::Name => "Name",
        };
        let selected = if state.sort == key { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{}\"{}>{}</option>", key.as_str(), selected, label);
    }
    html.push_str("</select><button type=\"submit\">Apply</button></form>");
}

fn render_repo_card(html: &mut String, repo: &GitHubRepo) {
    let description = repo
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description available");

    let _ = write!(
        html,
        "<a class=\"card\" href=\"{}\" rel=\"noopener noreferrer\"><h3>{}</h3><p>{}</p>",
        escape_html(&repo.html_url),
        escape_html(&repo.name),
        escape_html(description),
    );
    if let Some(language) = &repo.language {
        let _ = write!(html, "<span class=\"badge\">{}</span>", escape_html(language));
    }
    for topic in &repo.topics {
        let _ = write!(html, "<span class=\"badge\">#{}</span>", escape_html(topic));
    }
    let _ = write!(
        html,
        "<p>&#11088; {} &middot; &#127860; {} &middot; updated {}</p></a>",
        repo.stargazers_count,
        repo.forks_count,
        repo.updated_at.format("%Y-%m-%d"),
    );
}

fn render_projects(html: &mut String, view: &PageView<'_>) {
    html.push_str("<section id=\"projects\"><h2>Featured Projects</h2>");
    render_controls(html, view);

    if view.items.is_empty() {
        let _ = write!(html, "<div class=\"empty\">{}</div></section>", EMPTY_PROJECTS_MESSAGE);
        return;
    }

    html.push_str("<div class=\"grid\">");
    for repo in &view.items {
        render_repo_card(html, repo);
    }
    html.push_str("</div><div class=\"pager\">");

    if view.has_prev() {
        let _ = write!(html, "<a href=\"{}\">Prev</a>", escape_html(&page_href(&view.state, view.page - 1)));
    } else {
        html.push_str("<span>Prev</span>");
    }
    let _ = write!(html, "<span>Page <strong>{}</strong> of {}</span>", view.page, view.total_pages);
    if view.has_next() {
        let _ = write!(html, "<a href=\"{}\">Next</a>", escape_html(&page_href(&view.state, view.page + 1)));
    } else {
        html.push_str("<span>Next</span>");
    }
    html.push_str("</div></section>");
}

fn render_skills(html: &mut String, content: &PortfolioContent) {
    if content.skill_categories.is_empty() {
        return;
    }
    html.push_str("<section id=\"skills\"><h2>Technical Expertise</h2><div class=\"skills\">");
    for category in &content.skill_categories {
        let _ = write!(html, "<div class=\"card\"><h3>{}</h3>", escape_html(&category.title));
        for skill in &category.skills {
            let _ = write!(html, "<span class=\"badge\">{}</span>", escape_html(skill));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
}

fn render_contact(html: &mut String, snapshot: &Snapshot, content: &PortfolioContent) {
    html.push_str("<section id=\"contact\" style=\"text-align:center\"><h2>Let&#39;s Build Something</h2>");
    if let Some(email) = contact_email(snapshot, content) {
        let _ = write!(html, "<a class=\"badge\" href=\"mailto:{}\">Get In Touch</a> ", escape_html(email));
    }
    if let Some(url) = profile_url(snapshot, content) {
        let _ = write!(html, "<a class=\"badge\" href=\"{}\">View GitHub</a>", escape_html(url));
    }
    html.push_str("</section>");
}
