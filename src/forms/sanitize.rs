//! Turning items read from one form into payloads the write API accepts
//!
//! The read API happily returns titles with embedded line breaks and
//! server-assigned identifiers, both of which `createItem` rejects.

use crate::api::models::{ChoiceOption, ChoiceQuestion, Item, ItemKind, Question, QuestionKind};

/// Replace `\n` with a single space and drop `\r`
pub fn strip_line_breaks(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Build a creation payload from an item read from another form.
///
/// Identifiers are removed at every level, choice options lose their
/// section jumps (they name items of the source form) and every writable
/// display string is newline-free. An item of unknown kind keeps only its
/// title and description.
pub fn sanitize(item: &Item) -> Item {
    let kind = item.kind.as_ref().map(|kind| match kind {
        ItemKind::QuestionItem(question_item) => {
            let mut question_item = question_item.clone();
            clean_question(&mut question_item.question);
            ItemKind::QuestionItem(question_item)
        }
        ItemKind::QuestionGroupItem(group) => {
            let mut group = group.clone();
            for row in &mut group.questions {
                clean_question(row);
            }
            if let Some(grid) = &mut group.grid {
                clean_choice(&mut grid.columns);
            }
            ItemKind::QuestionGroupItem(group)
        }
        ItemKind::VideoItem(video) => {
            let mut video = video.clone();
            video.caption = video.caption.as_deref().map(strip_line_breaks);
            ItemKind::VideoItem(video)
        }
        other => other.clone(),
    });

    Item {
        item_id: None,
        title: item.title.as_deref().map(strip_line_breaks),
        description: item.description.as_deref().map(strip_line_breaks),
        kind,
    }
}

/// Copy of `item` without server-assigned ids, for resubmitting it to the same form
pub fn without_identifiers(item: &Item) -> Item {
    let mut item = item.clone();
    item.item_id = None;
    match &mut item.kind {
        Some(ItemKind::QuestionItem(question_item)) => {
            question_item.question.question_id = None;
        }
        Some(ItemKind::QuestionGroupItem(group)) => {
            for row in &mut group.questions {
                row.question_id = None;
            }
        }
        _ => {}
    }
    item
}

fn clean_question(question: &mut Question) {
    question.question_id = None;
    match &mut question.kind {
        Some(QuestionKind::ScaleQuestion(scale)) => {
            scale.low_label = scale.low_label.as_deref().map(strip_line_breaks);
            scale.high_label = scale.high_label.as_deref().map(strip_line_breaks);
        }
        Some(QuestionKind::ChoiceQuestion(choice)) => clean_choice(choice),
        Some(QuestionKind::RowQuestion(row)) => row.title = strip_line_breaks(&row.title),
        _ => {}
    }
}

fn clean_choice(choice: &mut ChoiceQuestion) {
    for option in &mut choice.options {
        clean_option(option);
    }
}

fn clean_option(option: &mut ChoiceOption) {
    option.value = option.value.as_deref().map(strip_line_breaks);
    option.go_to_section_id = None;
}
