use crate::domain::value_objects::MAX_STARS;
use tracing::debug;

const DEFAULT_FORM_RATING: u8 = MAX_STARS as u8;

/// 管理フォームの入力値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminForm {
    pub name: String,
    pub pincode: String,
    pub product_name: String,
    pub product_link: String,
    pub review: String,
    pub rating: u8,
    /// data URI もしくは URL
    pub user_image: Option<String>,
}

impl Default for AdminForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            pincode: String::new(),
            product_name: String::new(),
            product_link: String::new(),
            review: String::new(),
            rating: DEFAULT_FORM_RATING,
            user_image: None,
        }
    }
}

/// 送信開始時点のフォームとセッション番号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    session: u64,
    form: AdminForm,
}

impl SubmitTicket {
    pub fn form(&self) -> &AdminForm {
        &self.form
    }

    pub fn session(&self) -> u64 {
        self.session
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    Ready(SubmitTicket),
    PanelClosed,
    EmptyPincode,
    AlreadyPending,
}

/// 管理パネルの開閉・フォーム・ジオコーディング中フラグ
///
/// 閉じるたびにセッション番号が進み、古いチケットの結果は `finish` で捨てられる。
#[derive(Debug, Clone, Default)]
pub struct AdminPanel {
    is_open: bool,
    form: AdminForm,
    is_geocoding: bool,
    session: u64,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_geocoding(&self) -> bool {
        self.is_geocoding
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn form(&self) -> &AdminForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AdminForm {
        &mut self.form
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// 閉じる。送信中だった場合、その結果は無視される。
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        if self.is_geocoding {
            debug!("Admin panel dismissed while geocoding, result will be ignored");
        }
        self.is_open = false;
        self.is_geocoding = false;
        self.session += 1;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn begin_submit(&mut self) -> SubmitStart {
        if !self.is_open {
            return SubmitStart::PanelClosed;
        }
        if self.is_geocoding {
            return SubmitStart::AlreadyPending;
        }
        if self.form.pincode.trim().is_empty() {
            return SubmitStart::EmptyPincode;
        }

        self.is_geocoding = true;
        SubmitStart::Ready(SubmitTicket {
            session: self.session,
            form: self.form.clone(),
        })
    }

    pub fn is_current(&self, ticket: &SubmitTicket) -> bool {
        self.is_geocoding && ticket.session == self.session
    }

    /// 送信を完了する。チケットが古い場合は何もせず false を返す。
    /// 成功時はフォームを初期化してパネルを閉じ、失敗時は入力を保持する。
    pub fn finish(&mut self, ticket: &SubmitTicket, succeeded: bool) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.is_geocoding = false;
        if succeeded {
            self.form = AdminForm::default();
            self.close();
        }
        true
    }
}
