//! Data models mirrored from the backend
//!
//! Request bodies, query builders and the local patch helpers live next to
//! the record they belong to.

pub mod status;
pub mod reference;
pub mod event;
pub mod guest;
pub mod driver;
pub mod transfer;
pub mod user;
pub mod auth;
pub mod stats;
pub mod settings;

pub use status::{BusyStatus, DriverStatus, EventStatus, GuestStatus, TransferStatus, UserRole, VehicleType};
pub use reference::{normalize_ids, Entity, Ref};
pub use event::{Event, EventDetail, EventForm, EventQuery, EventUpdate, EventsPage};
pub use guest::{Guest, GuestForm, GuestQuery, GuestUpdate, GuestsPage};
pub use driver::{
    validate_new_password, BusyStatusUpdate, Driver, DriverDraft, DriverForm, DriverQuery,
    DriverUpdate, DriversPage, PasswordChange, MIN_PASSWORD_LENGTH,
};
pub use transfer::{NewTransfer, Transfer, TransferQuery, TransferUpdate, TransfersPage};
pub use user::{Module, ModuleAccess, NewUser, User, UserDraft, UserUpdate};
pub use auth::{AuthPayload, ForgotPasswordRequest, LoginCredentials, ResetPasswordRequest, SetupData, SetupStatus};
pub use stats::{DashboardStats, DriverStats, Trend, Trends, VehicleCount, WeeklyPoint};
pub use settings::{AuditExport, AuditLog, AuditRange, LoginSession};
