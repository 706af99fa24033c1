//! Download progress component

use crate::gui::app::Message;
use crate::progress::{DownloadStage, ProgressUpdate};
use iced::widget::{column, progress_bar as iced_progress_bar, row, text, Space};
use iced::{Alignment, Element, Length};

/// Progress bar with a stage label, percentage, and transfer speed
pub fn progress_bar(update: &ProgressUpdate) -> Element<'static, Message> {
    use crate::gui::theme;

    let style = match update.stage {
        DownloadStage::Done => {
            iced::theme::ProgressBar::Custom(Box::new(theme::ProgressBarCompleted))
        }
        DownloadStage::Failed => {
            iced::theme::ProgressBar::Custom(Box::new(theme::ProgressBarFailed))
        }
        _ => iced::theme::ProgressBar::Custom(Box::new(theme::ProgressBarStyle)),
    };

    let stage_color = match update.stage {
        DownloadStage::Done => theme::SUCCESS,
        DownloadStage::Failed => theme::DANGER,
        _ => theme::TEXT_SECONDARY,
    };

    let mut status_row = row![
        text(update.stage.label())
            .size(14)
            .style(iced::theme::Text::Color(stage_color)),
        Space::with_width(Length::Fill),
        text(format!("{:.1}%", update.percent))
            .size(14)
            .style(iced::theme::Text::Color(theme::TEXT_PRIMARY)),
    ]
    .spacing(8)
    .align_items(Alignment::Center);

    if let Some(speed) = update.speed {
        status_row = status_row.push(
            text(format_speed(speed))
                .size(14)
                .style(iced::theme::Text::Color(theme::TEXT_SECONDARY)),
        );
    }

    column![
        status_row,
        iced_progress_bar(0.0..=100.0, update.percent)
            .height(Length::Fixed(10.0))
            .style(style),
    ]
    .spacing(8)
    .into()
}

/// Format bytes per second as human-readable string
fn format_speed(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    if bytes_per_sec >= MB {
        format!("{:.2} MB/s", bytes_per_sec / MB)
    } else if bytes_per_sec >= KB {
        format!("{:.1} KB/s", bytes_per_sec / KB)
    } else {
        format!("{:.0} B/s", bytes_per_sec)
    }
}
