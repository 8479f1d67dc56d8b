//! User-facing texts
//!
//! Everything is rendered as Telegram HTML. Dataset fields are escaped, so a
//! stray `<` or `&` in a synopsis cannot break the caption.

use crate::dataset::{AnimeRecord, Dataset};
use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

/// Telegram limit for photo captions, in UTF-16 code units of the text left
/// after entity parsing
pub const CAPTION_LIMIT: usize = 1024;

/// Telegram limit for text messages is 4096, we use 4000 for safety
pub const MESSAGE_LIMIT: usize = 4000;

/// Reply for a number outside the dataset range
pub const INVALID_SELECTION_TEXT: &str =
    "Invalid anime selection. Please select a valid number from the list.";

/// Reply when no title matches
pub const NOT_FOUND_TEXT: &str =
    "Anime not found. Please try again with a different name or use /list to see available anime.";

/// Rendered details of one anime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeReply {
    /// HTML caption
    pub caption: String,
    /// Cover image URL or file id; `None` if the record has no image
    pub image: Option<String>,
}

impl AnimeReply {
    /// Returns true if the caption can be attached to the photo directly
    #[must_use]
    pub fn fits_caption(&self) -> bool {
        visible_len(&self.caption) <= CAPTION_LIMIT
    }
}

/// Length Telegram counts against the caption limit: tags stripped, entities
/// decoded, measured in UTF-16 code units.
fn visible_len(html: &str) -> usize {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    decode_html_entities(&text).encode_utf16().count()
}

/// Welcome message for `/start`
#[must_use]
pub const fn welcome_text() -> &'static str {
    "🌟✨ <b>Welcome to Silymoona Anime Search Bot!</b> ✨🌟\n\n\
     Feel the magic 🧙‍♂️✨ by sending me the name of an anime 🎌📺 to get all the juicy details about it 🤩✨. \
     Or simply use /list to explore our vast library of available anime titles 📚🌟.\n\n\
     Let's embark on an anime adventure together! 🚀🌈"
}

/// Message sent to users who have not joined the gating channel
#[must_use]
pub fn join_prompt(join_link: &str, channel_id: &str) -> String {
    format!(
        "Please join our channel {} to use the bot: {}",
        encode_text(join_link),
        encode_text(channel_id)
    )
}

/// Render a record as a photo caption
#[must_use]
pub fn format_anime(record: &AnimeRecord) -> AnimeReply {
    let caption = format!(
        "✨ <b>Title:</b> {title}\n\
         📖 <b>Synopsis:</b> {synopsis}\n\
         🌐 <b>Language:</b> {language}\n\
         📺 <b>Episodes:</b> {episodes}\n\
         \n\
         🌟 <b>Streaming Options:</b>\n\
         - {sub} [Watch Now] 📼\n\
         - {dub} [Watch Now] 📼\n\
         \n\
         💾 <b>Download Link:</b>\n\
         - {download} 💾\n\
         \n\
         🔗 <b>Website:</b> {website}",
        title = encode_text(&record.title),
        synopsis = encode_text(&record.synopsis),
        language = encode_text(&record.language),
        episodes = encode_text(&record.episodes.to_string()),
        sub = link("Sub", &record.sub),
        dub = link("Dub", &record.dub),
        download = link("Download Now", &record.download),
        website = link("Visit Website", &record.website),
    );

    let image = record.image.trim();
    AnimeReply {
        caption,
        image: (!image.is_empty()).then(|| image.to_string()),
    }
}

/// Anchor tag, or the bare label when there is nothing to link to
fn link(label: &str, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        label.to_string()
    } else {
        format!("<a href=\"{}\">{label}</a>", encode_double_quoted_attribute(url))
    }
}

/// Numbered title list for `/list`, split into messages of at most `max_len` chars.
///
/// Lines are never split; a single line longer than `max_len` gets a message
/// of its own.
#[must_use]
pub fn format_title_list(dataset: &Dataset, max_len: usize) -> Vec<String> {
    if dataset.is_empty() {
        return vec!["📚 The library is empty right now.".to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::from("📚 <b>Available anime:</b>\n");
    let mut current_len = current.chars().count();
    // The header always shares a message with at least the first title
    let mut has_titles = false;

    for (index, record) in dataset.iter().enumerate() {
        let line = format!("\n{}. {}", index + 1, encode_text(&record.title));
        let line_len = line.chars().count();

        if has_titles && current_len + line_len > max_len {
            parts.push(current.trim().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(&line);
        current_len += line_len;
        has_titles = true;
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}
