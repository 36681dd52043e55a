use askama::Template;

use crate::services::OverdueNotice;

#[derive(Template)]
#[template(path = "overdue_notice.html")]
pub struct OverdueNoticeTemplate<'a> {
    pub notice: &'a OverdueNotice,
}
