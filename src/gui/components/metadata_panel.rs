//! Video metadata preview component

use crate::extractor::FetchedMetadata;
use crate::gui::app::Message;
use iced::widget::{column, container, image, row, text};
use iced::{Alignment, Element, Length};

const THUMBNAIL_WIDTH: f32 = 160.0;

/// Panel showing the fetched video details and thumbnail preview
pub fn metadata_panel(fetched: &FetchedMetadata) -> Element<'static, Message> {
    use crate::gui::theme;

    let info = &fetched.info;

    let mut details = column![text(info.title.clone())
        .size(16)
        .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),]
    .spacing(6);

    if let Some(uploader) = &info.uploader {
        details = details.push(
            text(format!("by {}", uploader))
                .size(13)
                .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        );
    }

    let mut stats = row![text(info.duration_display())
        .size(13)
        .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),]
    .spacing(16)
    .align_items(Alignment::Center);

    if let Some(views) = info.view_count {
        stats = stats.push(
            text(format!("{} views", format_views(views)))
                .size(13)
                .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        );
    }

    details = details.push(stats);

    let content: Element<'static, Message> = match &fetched.thumbnail_bytes {
        Some(bytes) => {
            let handle = image::Handle::from_memory(bytes.clone());
            row![
                image(handle).width(Length::Fixed(THUMBNAIL_WIDTH)),
                details.width(Length::Fill),
            ]
            .spacing(16)
            .align_items(Alignment::Center)
            .into()
        }
        None => details.width(Length::Fill).into(),
    };

    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(
            theme::GlassContainer,
        )))
        .into()
}

/// Format a view count with thousands separators
fn format_views(views: u64) -> String {
    let digits = views.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
