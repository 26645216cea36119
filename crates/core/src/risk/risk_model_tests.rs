//! Tests for the static risk tables.

#[cfg(test)]
mod tests {
    use crate::locale::Locale;
    use crate::risk::{
        color_of, label_of, label_of_locale, level_of, score_of, QrDisplay, RiskCode,
        RiskDisplay, COLOR_DEFAULT,
    };

    // ==================== Table Lookups ====================

    #[test]
    fn test_risk_table_values() {
        assert_eq!(color_of(RiskCode::Red), "#EC3131");
        assert_eq!(level_of(RiskCode::Green), Some(1));
        assert_eq!(score_of(RiskCode::Orange), Some(50));
        assert_eq!(label_of(RiskCode::Yellow), Some("ความเสี่ยงน้อย"));
    }

    #[test]
    fn test_levels_and_scores_follow_severity() {
        let codes = [
            RiskCode::Green,
            RiskCode::Yellow,
            RiskCode::Orange,
            RiskCode::Red,
        ];
        let levels: Vec<u8> = codes.iter().filter_map(|c| level_of(*c)).collect();
        let scores: Vec<u8> = codes.iter().filter_map(|c| score_of(*c)).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        assert_eq!(scores, vec![100, 80, 50, 30]);
    }

    #[test]
    fn test_unknown_code_uses_defaults() {
        let code = RiskCode::from_code("purple");
        assert_eq!(code, RiskCode::Unknown);
        assert_eq!(color_of(code), COLOR_DEFAULT);
        assert_eq!(level_of(code), None);
        assert_eq!(score_of(code), None);
        assert_eq!(label_of(code), None);
        assert_eq!(label_of_locale(code, Locale::En), None);
    }

    #[test]
    fn test_english_labels() {
        assert_eq!(label_of_locale(RiskCode::Green, Locale::En), Some("Very low risk"));
        assert_eq!(label_of_locale(RiskCode::Red, Locale::En), Some("High risk"));
    }

    // ==================== Parsing & Serialization ====================

    #[test]
    fn test_from_code_accepts_compact_letters() {
        assert_eq!(RiskCode::from_code("G"), RiskCode::Green);
        assert_eq!(RiskCode::from_code("y"), RiskCode::Yellow);
        assert_eq!(RiskCode::from_code("O"), RiskCode::Orange);
        assert_eq!(RiskCode::from_code(" RED "), RiskCode::Red);
        assert_eq!(RiskCode::from_code(""), RiskCode::Unknown);
    }

    #[test]
    fn test_risk_code_serialization() {
        assert_eq!(serde_json::to_string(&RiskCode::Orange).unwrap(), "\"orange\"");
        assert_eq!(
            serde_json::from_str::<RiskCode>("\"yellow\"").unwrap(),
            RiskCode::Yellow
        );
        assert_eq!(
            serde_json::from_str::<RiskCode>("\"black\"").unwrap(),
            RiskCode::Unknown
        );
    }

    // ==================== Display Capability ====================

    #[test]
    fn test_qr_display_from_risk() {
        let display = QrDisplay::from_risk(&RiskCode::Green, Locale::En);
        assert_eq!(display.color, "#27C269");
        assert_eq!(display.level, Some(1));
        assert_eq!(display.score, Some(100));
        assert_eq!(display.label, Some("Very low risk"));

        let json = serde_json::to_value(&display).unwrap();
        assert_eq!(json["code"], "green");
        assert_eq!(json["score"], 100);
    }

    #[test]
    fn test_risk_display_defaults_delegate_to_tables() {
        let code = RiskCode::Orange;
        assert_eq!(code.color(), color_of(code));
        assert_eq!(code.level(), Some(3));
        assert_eq!(code.label(Locale::Th), Some("ความเสี่ยงปานกลาง"));
    }
}
