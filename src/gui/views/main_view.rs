//! Main view implementation - Light Theme

use crate::coordinator::request::VideoQuality;
use crate::extractor::FetchedMetadata;
use crate::gui::app::{Message, StatusMessage, StatusTone};
use crate::gui::components::{metadata_panel, progress_bar, url_input};
use crate::progress::ProgressUpdate;
use crate::utils::AppSettings;
use iced::widget::{button, checkbox, column, container, pick_list, row, text, Space};
use iced::{Alignment, Element, Length};

/// Create the main view
#[allow(clippy::too_many_arguments)]
pub fn main_view(
    url_value: &str,
    url_error: Option<&str>,
    settings: &AppSettings,
    recent: &[String],
    metadata: Option<&FetchedMetadata>,
    fetching_metadata: bool,
    downloading: bool,
    progress: Option<&ProgressUpdate>,
    status: Option<&StatusMessage>,
) -> Element<'static, Message> {
    use crate::gui::theme;

    let can_submit = !url_value.trim().is_empty() && !downloading;

    // Hero Input Section
    let mut hero_column = column![
        text("Download Video")
            .size(30)
            .style(iced::theme::Text::Color(theme::GRAY_800)),
        url_input(
            url_value,
            Message::UrlInputChanged,
            Message::DownloadPressed,
            Message::PasteFromClipboard,
            Message::ClearUrlInput,
            url_error,
        ),
    ]
    .spacing(20);

    if !recent.is_empty() {
        hero_column = hero_column.push(
            pick_list(
                recent.to_vec(),
                None::<String>,
                Message::RecentUrlPicked,
            )
            .placeholder("Recent URLs")
            .text_size(13)
            .padding([6, 10])
            .width(Length::Fill),
        );
    }

    // Options row
    hero_column = hero_column.push(
        row![
            // Quality dropdown
            container(
                column![
                    text("Quality")
                        .size(11)
                        .style(iced::theme::Text::Color(theme::GRAY_500)),
                    pick_list(
                        &VideoQuality::ALL[..],
                        Some(settings.quality),
                        Message::QualitySelected
                    )
                    .text_size(12)
                    .padding([6, 10])
                    .width(Length::Fixed(140.0)),
                ]
                .spacing(4)
            )
            .padding([8, 12])
            .style(iced::theme::Container::Custom(Box::new(InfoTagStyle))),
            // Format tag
            container(
                column![
                    text("Format")
                        .size(11)
                        .style(iced::theme::Text::Color(theme::GRAY_500)),
                    text("MP4")
                        .size(12)
                        .style(iced::theme::Text::Color(theme::GRAY_800)),
                ]
                .spacing(4)
            )
            .padding([8, 12])
            .style(iced::theme::Container::Custom(Box::new(InfoTagStyle))),
            // Extras
            container(
                column![
                    text("Extras")
                        .size(11)
                        .style(iced::theme::Text::Color(theme::GRAY_500)),
                    row![
                        checkbox("Subtitles", settings.include_subtitles)
                            .on_toggle(Message::SubtitlesToggled)
                            .size(16)
                            .text_size(12)
                            .spacing(6),
                        checkbox("Thumbnail", settings.include_thumbnail)
                            .on_toggle(Message::ThumbnailToggled)
                            .size(16)
                            .text_size(12)
                            .spacing(6),
                    ]
                    .spacing(16),
                ]
                .spacing(4)
            )
            .padding([8, 12])
            .style(iced::theme::Container::Custom(Box::new(InfoTagStyle))),
        ]
        .spacing(12),
    );

    // Output directory row
    hero_column = hero_column.push(
        row![
            text("Save to")
                .size(13)
                .style(iced::theme::Text::Color(theme::GRAY_500)),
            text(settings.download_dir.display().to_string())
                .size(13)
                .style(iced::theme::Text::Color(theme::GRAY_600)),
            Space::with_width(Length::Fill),
            button(text("Browse").size(13))
                .on_press(Message::BrowseDirectory)
                .padding([8, 12])
                .style(iced::theme::Button::Custom(Box::new(theme::IconButton))),
            button(text("Open Folder").size(13))
                .on_press(Message::OpenDirectory)
                .padding([8, 12])
                .style(iced::theme::Button::Custom(Box::new(theme::IconButton))),
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    );

    // Action row
    hero_column = hero_column.push(
        row![
            Space::with_width(Length::Fill),
            button(
                text(if fetching_metadata {
                    "Fetching..."
                } else {
                    "Fetch Info"
                })
                .size(14)
            )
            .on_press_maybe(if !url_value.trim().is_empty() && !fetching_metadata {
                Some(Message::FetchInfoPressed)
            } else {
                None
            })
            .padding([14, 24])
            .style(iced::theme::Button::Custom(Box::new(theme::SecondaryButton))),
            button(
                text(if downloading {
                    "Downloading..."
                } else {
                    "Download"
                })
                .size(16)
            )
            .on_press_maybe(if can_submit {
                Some(Message::DownloadPressed)
            } else {
                None
            })
            .padding([16, 32])
            .style(iced::theme::Button::Custom(Box::new(theme::PrimaryButton))),
        ]
        .spacing(12)
        .align_items(Alignment::Center),
    );

    let hero_section = container(hero_column)
        .padding(32)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(
            theme::GlassContainer,
        )));

    let mut content = column![hero_section].spacing(24);

    if let Some(fetched) = metadata {
        content = content.push(metadata_panel(fetched));
    }

    if let Some(update) = progress {
        content = content.push(
            container(progress_bar(update))
                .padding(16)
                .width(Length::Fill)
                .style(iced::theme::Container::Custom(Box::new(
                    theme::GlassContainer,
                ))),
        );
    }

    if let Some(message) = status {
        let color = match message.tone {
            StatusTone::Info => theme::TEXT_SECONDARY,
            StatusTone::Success => theme::SUCCESS,
            StatusTone::Error => theme::DANGER,
        };

        content = content.push(
            text(message.text.clone())
                .size(14)
                .style(iced::theme::Text::Color(color)),
        );
    }

    content
        .width(Length::Fill)
        .height(Length::Fill)
        .padding([32, 32, 32, 32])
        .into()
}

// Info tag style
struct InfoTagStyle;

impl iced::widget::container::StyleSheet for InfoTagStyle {
    type Style = iced::Theme;

    fn appearance(&self, _style: &Self::Style) -> iced::widget::container::Appearance {
        use crate::gui::theme;

        iced::widget::container::Appearance {
            background: Some(iced::Background::Color(theme::GRAY_100)),
            border: iced::Border {
                color: theme::GRAY_200,
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        }
    }
}
