//! Report lookup tables.
//!
//! The upsert engine consults these when the form left the campaign code or
//! product blank: the code comes from the campaign name, the product from
//! the code, before the catch-all defaults apply.

/// Campaign code for a report campaign name, if it is one of the mapped
/// campaigns.
pub fn code_for_campaign(campaign: &str) -> Option<&'static str> {
    Some(match campaign {
        "Portabilidad" => "Movil_Portabilidad",
        "Cambio de Plan" => "Movil_Cambio Plan",
        "Migra Positiva" => "Movil_Migracion",
        "Linea nueva con Factura" => "Movil_Linea Nueva",
        "Linea nueva Prepago" => "Movil_Linea Nueva Prepago",
        "Compra de Equipo" => "Movil_Cambio Equipo",
        "Internet/TV" => "Fija_Alta",
        _ => return None,
    })
}

/// Product family for a campaign code.
pub fn product_for_code(code: &str) -> Option<&'static str> {
    Some(match code {
        "Movil_Portabilidad"
        | "Movil_Cambio Plan"
        | "Movil_Migracion"
        | "Movil_Linea Nueva"
        | "Movil_Linea Nueva Prepago"
        | "Movil_Cambio Equipo" => "Movil",
        "Fija_Alta" => "Fijo",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_to_code() {
        assert_eq!(code_for_campaign("Portabilidad"), Some("Movil_Portabilidad"));
        assert_eq!(code_for_campaign("Internet/TV"), Some("Fija_Alta"));
        assert_eq!(code_for_campaign("unknown"), None);
    }

    #[test]
    fn test_code_to_product() {
        assert_eq!(product_for_code("Movil_Portabilidad"), Some("Movil"));
        assert_eq!(product_for_code("Fija_Alta"), Some("Fijo"));
        assert_eq!(product_for_code("SIN-COD"), None);
    }

    #[test]
    fn test_every_mapped_code_has_a_product() {
        for campaign in [
            "Portabilidad",
            "Cambio de Plan",
            "Migra Positiva",
            "Linea nueva con Factura",
            "Linea nueva Prepago",
            "Compra de Equipo",
            "Internet/TV",
        ] {
            let code = code_for_campaign(campaign).unwrap();
            assert!(product_for_code(code).is_some(), "no product for {code}");
        }
    }
}
