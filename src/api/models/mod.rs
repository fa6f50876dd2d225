//! Wire types for the Forms, Drive and Sheets APIs
//!
//! These mirror Google's camelCase JSON documents so they can be read and
//! resubmitted without hand-written conversion.

pub mod drive;
pub mod form;
pub mod item;
pub mod response;
pub mod sheets;

pub use drive::{DriveFile, DriveFileList};
pub use form::{Form, FormInfo, FormSettings, NewForm, QuizSettings, edit_uri};
pub use item::{
    ChoiceOption, ChoiceQuestion, ChoiceType, DateQuestion, FileUploadQuestion, Grid, ImageItem,
    Item, ItemKind, PageBreakItem, Question, QuestionGroupItem, QuestionItem, QuestionKind,
    RatingQuestion, RowQuestion, ScaleQuestion, TextItem, TextQuestion, TimeQuestion, VideoItem,
};
pub use response::{Answer, FormResponse, ResponseList, TextAnswer, TextAnswers};
pub use sheets::{BatchValueRanges, GridProperties, Sheet, SheetProperties, Spreadsheet, SpreadsheetProperties, ValueRange};
