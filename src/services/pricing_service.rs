use serde::Serialize;

pub struct PricingService;

impl PricingService {
    /// Parse a display price such as `"$2,299"` into whole dollars.
    ///
    /// Returns `None` when no digits remain after dropping `$` and `,`, or when
    /// anything else is left over.
    pub fn parse_price(display: &str) -> Option<u64> {
        let digits: String = display
            .trim()
            .chars()
            .filter(|c| *c != '$' && *c != ',')
            .collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Leading day count of a duration such as `"14 Days"`.
    pub fn parse_duration_days(display: &str) -> Option<u32> {
        let digits: String = display
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// Saturates at `u64::MAX` instead of overflowing.
    pub fn compute_total(unit_price: u64, travelers: TravelerCount) -> u64 {
        unit_price.saturating_mul(u64::from(travelers.get()))
    }

    /// Whole-dollar amount with thousands separators: `6897` -> `"$6,897"`.
    pub fn format_usd(amount: u64) -> String {
        let digits = amount.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("${}", grouped)
    }

    pub fn quote(unit_price: u64, travelers: TravelerCount) -> Quote {
        let total_price = Self::compute_total(unit_price, travelers);
        Quote {
            unit_price,
            travelers: travelers.get(),
            total_price,
            formatted_total: Self::format_usd(total_price),
        }
    }
}

/// Number of travelers on an inquiry, always within `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelerCount {
    count: u32,
    max: u32,
}

impl TravelerCount {
    pub fn new(max: u32) -> Self {
        Self {
            count: 1,
            max: max.max(1),
        }
    }

    /// Clamp an arbitrary requested count into `1..=max`.
    pub fn clamped(requested: u32, max: u32) -> Self {
        let max = max.max(1);
        Self {
            count: requested.clamp(1, max),
            max,
        }
    }

    pub fn get(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn increment(&mut self) {
        if self.count < self.max {
            self.count += 1;
        }
    }

    pub fn decrement(&mut self) {
        if self.count > 1 {
            self.count -= 1;
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub unit_price: u64,
    pub travelers: u32,
    pub total_price: u64,
    pub formatted_total: String,
}
