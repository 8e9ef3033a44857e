use crate::constants::{defaults, web};
use crate::error::{AsterError, Result};
use std::time::Duration;

const SOURCE: &str = "web";

/// Fetch `url` and return the page's visible text.
///
/// Non-HTML bodies are returned as-is. Bodies over the page limit are cut at a
/// char boundary before stripping.
pub fn fetch_text(url: &str) -> Result<String> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AsterError::config(format!(
            "Expected an http(s) URL, got '{url}'"
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(web::FETCH_TIMEOUT_SECS))
        .user_agent(defaults::USER_AGENT)
        .build()
        .map_err(|e| AsterError::backend(SOURCE, format!("Failed to create HTTP client: {e}")))?;

    tracing::debug!(url, "fetching page");
    let response = client
        .get(url)
        .send()
        .map_err(|e| AsterError::backend(SOURCE, format!("Request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AsterError::backend(SOURCE, format!("HTTP {status} for {url}")));
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("html"))
        .unwrap_or(true);

    let mut body = response
        .text()
        .map_err(|e| AsterError::backend(SOURCE, format!("Failed to read body: {e}")))?;
    truncate_at_char_boundary(&mut body, web::MAX_PAGE_BYTES);

    Ok(if is_html { html_to_text(&body) } else { body })
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

/// Strip tags, drop `<script>`/`<style>` bodies, decode the common entities
/// and collapse whitespace into single spaces and blank-line-free lines.
pub fn html_to_text(html: &str) -> String {
    let without_code = drop_elements(html, &["script", "style", "noscript"]);
    let stripped = strip_html_tags(&without_code);
    let decoded = decode_entities(&stripped);

    decoded
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn drop_elements(html: &str, names: &[&str]) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while pos < html.len() {
        let next = names
            .iter()
            .filter_map(|name| {
                lower[pos..]
                    .find(&format!("<{name}"))
                    .map(|i| (pos + i, *name))
            })
            .min_by_key(|(i, _)| *i);

        let Some((start, name)) = next else {
            out.push_str(&html[pos..]);
            break;
        };
        out.push_str(&html[pos..start]);

        let close = format!("</{name}");
        pos = match lower[start..].find(&close) {
            Some(i) => {
                let after = start + i + close.len();
                lower[after..].find('>').map_or(html.len(), |j| after + j + 1)
            }
            None => html.len(),
        };
    }
    out
}

fn strip_html_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Decode the common named entities plus decimal (`&#8212;`) and hex
/// (`&#x2014;`) references in one pass. Anything unrecognised stays as-is.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| entity_char(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "nbsp" => Some(' '),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
