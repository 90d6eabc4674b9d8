//! Fragment renderer: manifest records to gallery markup.
//!
//! Rendering is deterministic for a given ordered record list. Each item
//! carries a staggered animation delay of `100 + 100 * index` milliseconds
//! and a title derived from the file name: extension stripped, underscores
//! replaced with spaces, title-cased.

use core_sync::ImageRecord;

/// Render the gallery items for one style. An empty record list renders to
/// an empty fragment.
pub fn render_style_items(style: &str, images: &[ImageRecord]) -> String {
    let items: Vec<String> = images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let delay = 100 + i * 100;
            let title = display_title(&image.name);
            let description = format!("Obra de estilo {}", title_case(style));
            let category = title_case(style);
            let alt = format!("{} tattoo work - {}", style, title);

            format!(
                r#"                    <div class="masonry-item" data-aos="fade-up" data-aos-delay="{delay}">
                        <div class="image-container" onclick="openLightbox('{path}', '{title}', '{description}')">
                            <img src="{path}" alt="{alt}">
                            <div class="image-overlay">
                                <div class="overlay-content">
                                    <span class="image-category">{category}</span>
                                    <h3>{title}</h3>
                                    <p>{description}</p>
                                </div>
                            </div>
                        </div>
                    </div>"#,
                path = image.local_path,
            )
        })
        .collect();

    items.join("\n")
}

/// Human-readable title from a file name: everything before the first dot,
/// underscores as spaces, title-cased.
fn display_title(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    title_case(&stem.replace('_', " "))
}

/// Uppercase each letter that follows a non-letter, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
