//! `Accept` header negotiation between the supported output formats.

use std::cmp::Ordering;

/// Output format of a rendered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
    PlainText,
}

impl Format {
    /// Formats offered to the client, in priority order for ties.
    const OFFERED: [Format; 2] = [Format::Html, Format::Json];

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Html => "text/html; charset=utf-8",
            Format::Json => "application/json",
            Format::PlainText => "text/plain; charset=utf-8",
        }
    }

    fn media_type(&self) -> MediaRange {
        match self {
            Format::Html => MediaRange::new("text", "html"),
            Format::Json => MediaRange::new("application", "json"),
            Format::PlainText => MediaRange::new("text", "plain"),
        }
    }

    /// Pick the format for an `Accept` header value.
    ///
    /// A missing header accepts anything, so HTML is chosen. When neither
    /// HTML nor JSON is acceptable the plain-text fallback is used.
    pub fn negotiate(accept: Option<&str>) -> Format {
        let Some(accept) = accept.filter(|value| !value.trim().is_empty()) else {
            return Format::Html;
        };
        let accept = Accept::parse(accept);

        let mut best: Option<(Format, f32, u8)> = None;
        for format in Self::OFFERED {
            let Some((quality, specificity)) = accept.quality_for(&format.media_type()) else {
                continue;
            };
            if quality <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_q, best_s)) => match quality.partial_cmp(&best_q) {
                    Some(Ordering::Greater) => true,
                    Some(Ordering::Equal) => specificity > best_s,
                    _ => false,
                },
            };
            if better {
                best = Some((format, quality, specificity));
            }
        }

        best.map(|(format, _, _)| format).unwrap_or(Format::PlainText)
    }
}

/// A `type/subtype` pair, either part possibly `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MediaRange {
    type_: String,
    subtype: String,
}

impl MediaRange {
    fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let essence = s.split(';').next()?.trim();
        let (type_, subtype) = essence.split_once('/')?;
        let (type_, subtype) = (type_.trim(), subtype.trim());
        if type_.is_empty() || subtype.is_empty() {
            return None;
        }
        Some(Self::new(&type_.to_lowercase(), &subtype.to_lowercase()))
    }

    fn matches(&self, concrete: &MediaRange) -> bool {
        (self.type_ == "*" || self.type_ == concrete.type_)
            && (self.subtype == "*" || self.subtype == concrete.subtype)
    }

    fn specificity(&self) -> u8 {
        let mut score = 0u8;
        if self.type_ != "*" {
            score += 2;
        }
        if self.subtype != "*" {
            score += 1;
        }
        score
    }
}

/// A parsed `Accept` header.
#[derive(Debug, Clone, Default)]
struct Accept {
    ranges: Vec<(MediaRange, f32)>,
}

impl Accept {
    fn parse(header: &str) -> Self {
        let ranges = header
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }
                let quality = part
                    .split(';')
                    .skip(1)
                    .filter_map(|param| param.split_once('='))
                    .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
                    .and_then(|(_, value)| value.trim().parse::<f32>().ok())
                    .unwrap_or(1.0)
                    .clamp(0.0, 1.0);
                MediaRange::parse(part).map(|range| (range, quality))
            })
            .collect();
        Self { ranges }
    }

    /// Quality and specificity of the most specific range matching
    /// `concrete`, or `None` if no range matches.
    fn quality_for(&self, concrete: &MediaRange) -> Option<(f32, u8)> {
        self.ranges
            .iter()
            .filter(|(range, _)| range.matches(concrete))
            .map(|(range, quality)| (*quality, range.specificity()))
            .max_by_key(|(_, specificity)| *specificity)
    }
}
