use crate::domain::model::RouteOffers;
use chrono::NaiveDate;

const STYLE: &str = "<style>\
body{font-family:sans-serif;max-width:50rem;margin:2rem auto;padding:0 1rem}\
h2 small{font-weight:normal;color:#555}\
p.created{color:#555}\
ul{margin:0.25rem 0 0.75rem}\
p.empty{color:#a00}\
</style>";

/// Line-oriented report, same shape as the log output the page replaces.
pub fn render_text(created: NaiveDate, routes: &[RouteOffers]) -> String {
    let mut lines = vec![format!("Creation date: {}", created.format("%Y-%m-%d"))];

    for route in routes {
        lines.push(String::new());
        lines.push(format!(
            "{} -> {} connections up from {}:",
            route.from, route.to, route.query.date
        ));

        for (index, entry) in route.connections.iter().enumerate() {
            lines.push(format!("  {}: {}:", index + 1, entry.connection));
            if entry.offers.is_empty() {
                lines.push("  - No offers".to_string());
            } else {
                for offer in &entry.offers {
                    lines.push(format!("  - {}", offer));
                }
            }
        }

        // Matches where pagination stopped: the notice follows any
        // connections that were found before the matches ran out.
        if route.exhausted {
            lines.push("No matching connections found".to_string());
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Self-contained HTML page for static-pages hosting.
pub fn render_html(created: NaiveDate, routes: &[RouteOffers]) -> String {
    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        "<html lang=\"en\">".to_string(),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string(),
        "<title>Nightjet offers</title>".to_string(),
        STYLE.to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        "<h1>Nightjet offers</h1>".to_string(),
        format!(
            "<p class=\"created\">Creation date: {}</p>",
            created.format("%Y-%m-%d")
        ),
    ];

    for route in routes {
        lines.push("<section>".to_string());
        lines.push(format!(
            "<h2>{} &rarr; {} <small>up from {}</small></h2>",
            escape_html(&route.from.to_string()),
            escape_html(&route.to.to_string()),
            route.query.date
        ));

        if !route.connections.is_empty() {
            lines.push("<ol>".to_string());
            for entry in &route.connections {
                lines.push(format!(
                    "<li>{}",
                    escape_html(&entry.connection.to_string())
                ));
                if entry.offers.is_empty() {
                    lines.push("<ul><li>No offers</li></ul>".to_string());
                } else {
                    lines.push("<ul>".to_string());
                    for offer in &entry.offers {
                        lines.push(format!("<li>{}</li>", escape_html(&offer.to_string())));
                    }
                    lines.push("</ul>".to_string());
                }
                lines.push("</li>".to_string());
            }
            lines.push("</ol>".to_string());
        }

        if route.exhausted {
            lines.push("<p class=\"empty\">No matching connections found</p>".to_string());
        }

        lines.push("</section>".to_string());
    }

    lines.push("</body>".to_string());
    lines.push("</html>".to_string());
    lines.join("\n")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
