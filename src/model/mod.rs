//! Entity definitions.
//!
//! Each entity comes with a draft (`NewXxx`) holding the caller-supplied
//! fields and a patch (`XxxPatch`) listing the fields an update may replace.

pub mod announcement;
pub mod attendance;
pub mod class;
pub mod fee;
pub mod homework;
pub mod record;
pub mod student;
pub mod system;
pub mod user;

pub use announcement::{Announcement, AnnouncementPatch, Audience, NewAnnouncement};
pub use attendance::{Attendance, AttendancePatch, AttendanceStatus, NewAttendance};
pub use class::{Class, ClassPatch, NewClass, ScheduleSlot};
pub use fee::{Fee, FeePatch, FeeStatus, NewFee};
pub use homework::{
    Homework, HomeworkPatch, HomeworkStatus, HomeworkSubmission, NewHomework, NewSubmission,
    SubmissionPatch, SubmissionStatus,
};
pub use record::{Record, Reference, UniqueKey, normalize_email};
pub use student::{NewStudent, Student, StudentPatch};
pub use system::{
    DEFAULT_SETTING_CATEGORY, LogDetails, NewSetting, NewSystemLog, SettingPatch, SystemLog,
    SystemSetting,
};
pub use user::{NewUser, Role, User, UserPatch};
