// Breakdown of the production LCOA by asset
use crate::config::parameters::{CountryParameters, TechnologyCosts};
use crate::models::results::{CostComponent, PlantCapacities};

/// Annualized capital cost of each asset and its share of the LCOA.
///
/// Only capital recovery is counted; fixed opex and compression costs are
/// left out, so the portions do not add up to the full production cost.
pub fn cost_components(
    capacities: &PlantCapacities,
    country: &CountryParameters,
    technology: &TechnologyCosts,
    annual_demand_kg: f64,
) -> Vec<CostComponent> {
    capacities
        .iter()
        .map(|(asset, capacity)| {
            let annual_cost = capacity * technology.record(asset).capital_cost * country.asset_crf(asset);
            CostComponent {
                asset,
                annual_cost,
                lcoa_portion: annual_cost / annual_demand_kg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::const_funcs::crf;
    use crate::config::parameters::fixtures::{country, technology};
    use crate::models::asset::AssetClass;
    use approx::assert_relative_eq;

    #[test]
    fn test_components_use_asset_financing() {
        let mut caps = PlantCapacities::uniform(0.0);
        caps.wind = 10.0;
        caps.electrolyzer = 4.0;
        let c = country();
        let tech = technology();

        let components = cost_components(&caps, &c, &tech, 1.0e6);
        assert_eq!(components.len(), 7);

        let wind = components.iter().find(|c| c.asset == AssetClass::Wind).unwrap();
        let expected = 10.0 * tech.wind.capital_cost * crf(0.06, 25.0);
        assert_relative_eq!(wind.annual_cost, expected, max_relative = 1e-12);
        assert_relative_eq!(wind.lcoa_portion, expected / 1.0e6, max_relative = 1e-12);

        let electrolyzer = components.iter().find(|c| c.asset == AssetClass::Electrolyzer).unwrap();
        let expected = 4.0 * tech.electrolyzer.capital_cost * crf(0.08, 20.0);
        assert_relative_eq!(electrolyzer.annual_cost, expected, max_relative = 1e-12);

        let battery = components.iter().find(|c| c.asset == AssetClass::Battery).unwrap();
        assert_eq!(battery.annual_cost, 0.0);
    }
}
