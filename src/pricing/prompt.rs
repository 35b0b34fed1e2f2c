use crate::pricing::query::PriceQuery;

/// Builds the price prompt. The model is asked for a bare JSON object, which
/// it does not always honour; see [`crate::pricing::parsing`].
pub fn build_price_prompt(query: &PriceQuery) -> String {
    let PriceQuery { crop, location } = query;
    format!(
        "Based on current market data, provide the optimal minimum and maximum selling price range \
         for {crop} in {location} to ensure farmers do not get cheated by buyers. \
         The range should be fair and based on location-specific factors. \
         Respond ONLY with a valid JSON object in this exact format: \
         {{\"min_price\": X, \"max_price\": Y, \"currency\": \"₹\", \"unit\": \"per kg\", \
         \"location\": \"{location}\", \"crop\": \"{crop}\"}} \
         where X and Y are numbers representing prices in Indian Rupees per kg. \
         Do not include any other text, explanations, or formatting - just the JSON object."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_crop_location_and_shape() {
        let prompt = build_price_prompt(&PriceQuery::new("Onion", "Nashik, Maharashtra"));
        assert!(prompt.contains("for Onion in Nashik, Maharashtra"));
        assert!(prompt.contains(
            r#"{"min_price": X, "max_price": Y, "currency": "₹", "unit": "per kg", "location": "Nashik, Maharashtra", "crop": "Onion"}"#
        ));
        assert!(prompt.contains("just the JSON object"));
    }
}
