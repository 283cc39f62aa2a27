pub mod cabinets;
pub mod health;
pub mod logs;
pub mod view;

use logdesk_application::LogTriageSession;

use crate::dto::ViewResponse;

fn view_response(session: &LogTriageSession) -> ViewResponse {
    ViewResponse {
        active_cabinet: session.active_cabinet().map(ToOwned::to_owned),
        show_processed: session.show_processed(),
    }
}
