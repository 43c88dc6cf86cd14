use serde::{Deserialize, Serialize};

/// 料金プラン
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Basic,
    Pro,
    Enterprise,
}

/// 請求サイクル
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    #[default]
    Monthly,
    Annual,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Free, Plan::Basic, Plan::Pro, Plan::Enterprise];

    pub fn parse(s: &str) -> Option<Plan> {
        match s {
            "free" => Some(Plan::Free),
            "basic" => Some(Plan::Basic),
            "pro" => Some(Plan::Pro),
            "enterprise" => Some(Plan::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Basic => "basic",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }

    /// プラン変更時に付与されるクレジット
    pub fn credit_grant(&self) -> i64 {
        match self {
            Plan::Free => 0,
            Plan::Basic => 50,
            Plan::Pro => 100,
            Plan::Enterprise => 500,
        }
    }

    /// 月額（セント）。Annual は年払い時の月あたり単価。
    pub fn monthly_price_cents(&self, billing: Billing) -> u32 {
        match (self, billing) {
            (Plan::Free, _) => 0,
            (Plan::Basic, Billing::Monthly) => 999,
            (Plan::Basic, Billing::Annual) => 799,
            (Plan::Pro, Billing::Monthly) => 1999,
            (Plan::Pro, Billing::Annual) => 1699,
            (Plan::Enterprise, Billing::Monthly) => 4999,
            (Plan::Enterprise, Billing::Annual) => 3999,
        }
    }

    /// 1回の請求額（セント）。年払いは12ヶ月分をまとめて請求する。
    pub fn charge_cents(&self, billing: Billing) -> u32 {
        match billing {
            Billing::Monthly => self.monthly_price_cents(billing),
            Billing::Annual => self.monthly_price_cents(billing) * 12,
        }
    }
}

impl Billing {
    pub fn parse(s: &str) -> Option<Billing> {
        match s {
            "monthly" => Some(Billing::Monthly),
            "annual" => Some(Billing::Annual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Billing::Monthly => "monthly",
            Billing::Annual => "annual",
        }
    }
}

/// ログイン中ユーザー（パスワードは含まない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub plan: Plan,
    pub credits: i64,
    pub created_at: String,
}

/// 模擬決済の領収書
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    /// 模擬トランザクションID
    pub id: String,
    pub plan: Plan,
    pub billing: Billing,
    pub amount_cents: u32,
    pub paid_at: String,
}

/// セント額を "$9.99" 形式に整形する
pub fn format_usd(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_grants() {
        assert_eq!(Plan::Free.credit_grant(), 0);
        assert_eq!(Plan::Basic.credit_grant(), 50);
        assert_eq!(Plan::Pro.credit_grant(), 100);
        assert_eq!(Plan::Enterprise.credit_grant(), 500);
    }

    #[test]
    fn annual_charge_is_twelve_months() {
        assert_eq!(Plan::Basic.charge_cents(Billing::Monthly), 999);
        assert_eq!(Plan::Basic.charge_cents(Billing::Annual), 799 * 12);
        assert_eq!(Plan::Free.charge_cents(Billing::Annual), 0);
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(1999), "$19.99");
        assert_eq!(format_usd(9588), "$95.88");
    }

    #[test]
    fn plan_parse() {
        for plan in Plan::ALL {
            assert_eq!(Plan::parse(plan.as_str()), Some(plan));
        }
        assert_eq!(Plan::parse("gold"), None);
        assert_eq!(Billing::parse("annual"), Some(Billing::Annual));
    }
}
