//! Frequency - How often a recurring obligation falls due

text_enum! {
    /// Recurrence used by rental payment schedules and distribution cycles
    pub enum Frequency {
        Monthly => "monthly",
        Quarterly => "quarterly",
        SemiAnnual => "semi_annual",
        Annual => "annual",
    }
}

impl Frequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::SemiAnnual => 2,
            Frequency::Annual => 1,
        }
    }

    pub fn months(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_mixed_case() {
        assert_eq!("Semi_Annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert!("weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_months_per_period() {
        assert_eq!(Frequency::Monthly.months(), 1);
        assert_eq!(Frequency::Quarterly.months(), 3);
        assert_eq!(Frequency::SemiAnnual.months(), 6);
        assert_eq!(Frequency::Annual.months(), 12);
    }
}
