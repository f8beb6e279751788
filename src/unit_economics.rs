use serde::Serialize;

/// Share of gross revenue that survives the 30% app-store cut and the 6%
/// revenue tax.
pub const NET_MARGIN_RATE: f64 = 0.64;

/// A derived number that may be genuinely not computable (as opposed to a
/// legitimate zero). Keeps the zero-vs-undefined distinction of the model
/// machine-checkable instead of overloading 0 or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Metric {
    Computed(f64),
    NotComputable,
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Computed(v) => Some(*v),
            Metric::NotComputable => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Metric::Computed(_))
    }
}

/// One value per subscription plan tier. Used both for prices (currency) and
/// for the audience mix (percentages).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlanTiers {
    pub weekly: f64,
    pub monthly: f64,
    pub biannual: f64,
    pub annual: f64,
}

impl PlanTiers {
    pub fn new(weekly: f64, monthly: f64, biannual: f64, annual: f64) -> Self {
        Self {
            weekly,
            monthly,
            biannual,
            annual,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [self.weekly, self.monthly, self.biannual, self.annual]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Form-style inputs of the what-if model. Not tied to stored records.
/// All rate fields are percentages as typed by the user (e.g. 40 for 40%).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UnitEconomicsInputs {
    pub plan_prices: PlanTiers,
    pub plan_mix: PlanTiers,
    /// Install → paywall view rate, percent.
    pub paywall_rate: f64,
    /// Paywall view → trial start rate, percent.
    pub trial_rate: f64,
    /// Trial → paid conversion rate, percent.
    pub conversion_rate: f64,
    pub monthly_revenue_goal: f64,
    pub annual_revenue_goal: f64,
    /// Hypothetical ad budget for the investment simulation.
    pub investment: f64,
}

/// Funnel cascade for a hypothetical investment, priced at break-even CPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvestmentSimulation {
    pub installs: f64,
    pub trials: f64,
    pub payers: f64,
    pub revenue: f64,
    pub profit: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitEconomicsOutputs {
    /// Mix-weighted average plan price.
    pub ltv: f64,
    /// Raw sum of the mix percentages. 100 means the mix is balanced; any
    /// other value is informational only, the weights are normalized anyway.
    pub mix_total: f64,
    /// Chained install → payer probability, as a fraction.
    pub full_funnel_rate: f64,
    /// Break-even cost per paying acquisition. Defined as LTV.
    pub max_cpa: f64,
    pub max_cpt: Metric,
    pub max_cpi: Metric,
    pub revenue_per_1000_downloads: f64,
    pub daily_downloads_for_monthly_goal: Metric,
    pub daily_downloads_for_annual_goal: Metric,
    /// `None` when max CPI is not computable or no investment was entered.
    pub simulation: Option<InvestmentSimulation>,
}

/// Pure what-if computation over the form inputs.
///
/// The LTV weights are each mix value divided by the actual mix sum, so a mix
/// that does not add up to 100 still yields a well-defined LTV (scaling every
/// mix entry by the same factor changes nothing). A mix summing to zero gives
/// an LTV of zero rather than a division by zero.
pub fn compute_unit_economics(inputs: &UnitEconomicsInputs) -> UnitEconomicsOutputs {
    let mix_total = inputs.plan_mix.total();

    let ltv = if mix_total > 0.0 {
        let prices = inputs.plan_prices.as_array();
        let mix = inputs.plan_mix.as_array();
        prices
            .iter()
            .zip(mix.iter())
            .map(|(price, share)| price * (share / mix_total))
            .sum()
    } else {
        0.0
    };

    let full_funnel_rate =
        (inputs.paywall_rate / 100.0) * (inputs.trial_rate / 100.0) * (inputs.conversion_rate / 100.0);

    let max_cpa = ltv;

    let max_cpt = if inputs.conversion_rate > 0.0 {
        Metric::Computed(ltv * inputs.conversion_rate / 100.0)
    } else {
        Metric::NotComputable
    };

    let max_cpi = if full_funnel_rate > 0.0 {
        Metric::Computed(ltv * full_funnel_rate)
    } else {
        Metric::NotComputable
    };

    let revenue_per_download = ltv * full_funnel_rate;
    let revenue_per_1000_downloads = revenue_per_download * 1000.0;

    let daily_downloads_for_monthly_goal = daily_download_target(
        inputs.monthly_revenue_goal,
        30.0,
        revenue_per_download,
    );
    let daily_downloads_for_annual_goal = daily_download_target(
        inputs.annual_revenue_goal,
        365.0,
        revenue_per_download,
    );

    let simulation = match max_cpi {
        Metric::Computed(cpi) if inputs.investment > 0.0 => {
            let installs = inputs.investment / cpi;
            let trials = installs * (inputs.paywall_rate / 100.0) * (inputs.trial_rate / 100.0);
            let payers = trials * (inputs.conversion_rate / 100.0);
            let revenue = payers * ltv;
            let profit = revenue - inputs.investment;
            Some(InvestmentSimulation {
                installs,
                trials,
                payers,
                revenue,
                profit,
                roi: profit / inputs.investment * 100.0,
            })
        }
        _ => None,
    };

    UnitEconomicsOutputs {
        ltv,
        mix_total,
        full_funnel_rate,
        max_cpa,
        max_cpt,
        max_cpi,
        revenue_per_1000_downloads,
        daily_downloads_for_monthly_goal,
        daily_downloads_for_annual_goal,
        simulation,
    }
}

fn daily_download_target(goal: f64, days: f64, revenue_per_download: f64) -> Metric {
    if revenue_per_download > 0.0 {
        Metric::Computed((goal / days) / revenue_per_download)
    } else {
        Metric::NotComputable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inputs() -> UnitEconomicsInputs {
        UnitEconomicsInputs {
            plan_prices: PlanTiers::new(10.0, 30.0, 150.0, 300.0),
            plan_mix: PlanTiers::new(25.0, 25.0, 25.0, 25.0),
            paywall_rate: 40.0,
            trial_rate: 50.0,
            conversion_rate: 20.0,
            monthly_revenue_goal: 30_000.0,
            annual_revenue_goal: 365_000.0,
            investment: 1000.0,
        }
    }

    #[test]
    fn test_ltv_balanced_mix_is_arithmetic_mean() {
        let out = compute_unit_economics(&base_inputs());
        assert_eq!(out.ltv, 122.5);
        assert_eq!(out.mix_total, 100.0);
    }

    #[test]
    fn test_ltv_invariant_under_mix_scaling() {
        let mut inputs = base_inputs();
        inputs.plan_mix = PlanTiers::new(10.0, 50.0, 30.0, 10.0);
        let baseline = compute_unit_economics(&inputs).ltv;

        for k in [0.5, 2.0, 7.0] {
            let mut scaled = inputs;
            scaled.plan_mix = PlanTiers::new(10.0 * k, 50.0 * k, 30.0 * k, 10.0 * k);
            let out = compute_unit_economics(&scaled);
            assert!((out.ltv - baseline).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_mix_gives_zero_ltv() {
        let mut inputs = base_inputs();
        inputs.plan_mix = PlanTiers::default();
        let out = compute_unit_economics(&inputs);
        assert_eq!(out.ltv, 0.0);
        assert!(out.ltv.is_finite());
    }

    #[test]
    fn test_full_funnel_rate() {
        let out = compute_unit_economics(&base_inputs());
        // 0.4 * 0.5 * 0.2
        assert!((out.full_funnel_rate - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_max_costs() {
        let out = compute_unit_economics(&base_inputs());
        assert_eq!(out.max_cpa, 122.5);
        assert_eq!(out.max_cpt, Metric::Computed(122.5 * 0.2));
        assert_eq!(out.max_cpi.value().unwrap(), 122.5 * 0.04);
    }

    #[test]
    fn test_zero_conversion_makes_cpt_not_computable() {
        let mut inputs = base_inputs();
        inputs.conversion_rate = 0.0;
        let out = compute_unit_economics(&inputs);
        assert_eq!(out.max_cpt, Metric::NotComputable);
        // A dead funnel also kills CPI and the simulation.
        assert_eq!(out.max_cpi, Metric::NotComputable);
        assert!(out.simulation.is_none());
    }

    #[test]
    fn test_revenue_per_1000_downloads() {
        let out = compute_unit_economics(&base_inputs());
        assert!((out.revenue_per_1000_downloads - 122.5 * 0.04 * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_download_targets() {
        let out = compute_unit_economics(&base_inputs());
        let per_download = 122.5 * 0.04;
        let monthly = out.daily_downloads_for_monthly_goal.value().unwrap();
        assert!((monthly - (30_000.0 / 30.0) / per_download).abs() < 1e-9);
        let annual = out.daily_downloads_for_annual_goal.value().unwrap();
        assert!((annual - (365_000.0 / 365.0) / per_download).abs() < 1e-9);

        let mut dead = base_inputs();
        dead.paywall_rate = 0.0;
        let out = compute_unit_economics(&dead);
        assert_eq!(out.daily_downloads_for_monthly_goal, Metric::NotComputable);
        assert_eq!(out.daily_downloads_for_annual_goal, Metric::NotComputable);
    }

    #[test]
    fn test_simulation_breaks_even_at_max_cpi() {
        let out = compute_unit_economics(&base_inputs());
        let sim = out.simulation.unwrap();
        // Installs bought at exactly the break-even CPI return the
        // investment: zero profit, zero ROI.
        assert!((sim.revenue - 1000.0).abs() < 1e-9);
        assert!(sim.profit.abs() < 1e-9);
        assert!(sim.roi.abs() < 1e-9);
        assert!((sim.payers * out.ltv - sim.revenue).abs() < 1e-9);
    }

    #[test]
    fn test_zero_investment_has_no_simulation() {
        let mut inputs = base_inputs();
        inputs.investment = 0.0;
        let out = compute_unit_economics(&inputs);
        assert!(out.simulation.is_none());
    }

    #[test]
    fn test_net_margin_constant() {
        // 100% - 30% store cut - 6% tax.
        assert!((NET_MARGIN_RATE - (1.0 - 0.30 - 0.06)).abs() < 1e-12);
    }
}
