// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Onboarding message sent on follow and group-join events.

use meshibot_core::OutboundNotification;

/// Mark tutorial shown when the bot is followed or joins a group.
pub fn onboarding_message() -> OutboundNotification {
    OutboundNotification::Text {
        text: "好みの居酒屋を教えてください!\n\
               日付 /\n\
               駅・場所 +\n\
               予算 ¥\n\
               フリーテキスト =\n\
               \n\
               例\n\
               /20230831\n\
               +新宿\n\
               ¥3500\n\
               =飲み放題 チーズ"
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_mentions_every_mark() {
        let OutboundNotification::Text { text } = onboarding_message() else {
            panic!("expected a text message");
        };
        for mark in ['/', '+', '¥', '='] {
            assert!(text.contains(mark), "missing mark {mark}");
        }
    }
}
