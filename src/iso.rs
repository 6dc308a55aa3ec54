use std::collections::HashMap;
use std::sync::LazyLock;

use crate::country::{Locale, fold_name};

/// One ISO 3166-1 entry: alpha-2 code, numeric code (as used by world-atlas
/// geometry ids) and the names a report or a geometry file may spell it with.
/// The first name of each locale is the display name.
pub struct IsoCountry {
    pub alpha2: &'static str,
    pub numeric: Option<u16>,
    pub en: &'static [&'static str],
    pub ru: &'static [&'static str],
}

impl IsoCountry {
    pub fn names(&self, locale: Locale) -> &'static [&'static str] {
        match locale {
            Locale::Ru => self.ru,
            Locale::En => self.en,
        }
    }

    pub fn display_name(&self, locale: Locale) -> &'static str {
        self.names(locale).first().copied().unwrap_or(self.alpha2)
    }
}

macro_rules! iso {
    ($a2:literal, none, [$($en:literal),+], [$($ru:literal),+]) => {
        IsoCountry { alpha2: $a2, numeric: None, en: &[$($en),+], ru: &[$($ru),+] }
    };
    ($a2:literal, $num:literal, [$($en:literal),+], [$($ru:literal),+]) => {
        IsoCountry { alpha2: $a2, numeric: Some($num), en: &[$($en),+], ru: &[$($ru),+] }
    };
}

pub static COUNTRIES: &[IsoCountry] = &[
    iso!("AF", 4, ["Afghanistan"], ["Афганистан"]),
    iso!("AL", 8, ["Albania"], ["Албания"]),
    iso!("AQ", 10, ["Antarctica"], ["Антарктида"]),
    iso!("DZ", 12, ["Algeria"], ["Алжир"]),
    iso!("AS", 16, ["American Samoa"], ["Американское Самоа"]),
    iso!("AD", 20, ["Andorra"], ["Андорра"]),
    iso!("AO", 24, ["Angola"], ["Ангола"]),
    iso!("AG", 28, ["Antigua and Barbuda", "Antigua and Barb."], ["Антигуа и Барбуда"]),
    iso!("AZ", 31, ["Azerbaijan"], ["Азербайджан"]),
    iso!("AR", 32, ["Argentina"], ["Аргентина"]),
    iso!("AU", 36, ["Australia"], ["Австралия"]),
    iso!("AT", 40, ["Austria"], ["Австрия"]),
    iso!("BS", 44, ["Bahamas", "The Bahamas"], ["Багамы", "Багамские Острова"]),
    iso!("BH", 48, ["Bahrain"], ["Бахрейн"]),
    iso!("BD", 50, ["Bangladesh"], ["Бангладеш"]),
    iso!("AM", 51, ["Armenia"], ["Армения"]),
    iso!("BB", 52, ["Barbados"], ["Барбадос"]),
    iso!("BE", 56, ["Belgium"], ["Бельгия"]),
    iso!("BM", 60, ["Bermuda"], ["Бермуды", "Бермудские Острова"]),
    iso!("BT", 64, ["Bhutan"], ["Бутан"]),
    iso!("BO", 68, ["Bolivia", "Plurinational State of Bolivia"], ["Боливия"]),
    iso!("BA", 70, ["Bosnia and Herzegovina", "Bosnia and Herz."], ["Босния и Герцеговина"]),
    iso!("BW", 72, ["Botswana"], ["Ботсвана"]),
    iso!("BV", 74, ["Bouvet Island"], ["Остров Буве"]),
    iso!("BR", 76, ["Brazil"], ["Бразилия"]),
    iso!("BZ", 84, ["Belize"], ["Белиз"]),
    iso!("IO", 86, ["British Indian Ocean Territory", "Br. Indian Ocean Ter."], ["Британская территория в Индийском океане"]),
    iso!("SB", 90, ["Solomon Islands", "Solomon Is."], ["Соломоновы Острова"]),
    iso!("VG", 92, ["British Virgin Islands", "British Virgin Is."], ["Британские Виргинские острова"]),
    iso!("BN", 96, ["Brunei", "Brunei Darussalam"], ["Бруней"]),
    iso!("BG", 100, ["Bulgaria"], ["Болгария"]),
    iso!("MM", 104, ["Myanmar", "Burma"], ["Мьянма"]),
    iso!("BI", 108, ["Burundi"], ["Бурунди"]),
    iso!("BY", 112, ["Belarus"], ["Беларусь"]),
    iso!("KH", 116, ["Cambodia"], ["Камбоджа"]),
    iso!("CM", 120, ["Cameroon"], ["Камерун"]),
    iso!("CA", 124, ["Canada"], ["Канада"]),
    iso!("CV", 132, ["Cabo Verde", "Cape Verde"], ["Кабо-Верде"]),
    iso!("KY", 136, ["Cayman Islands", "Cayman Is."], ["Острова Кайман", "Каймановы острова"]),
    iso!("CF", 140, ["Central African Republic", "Central African Rep."], ["Центральноафриканская Республика", "ЦАР"]),
    iso!("LK", 144, ["Sri Lanka"], ["Шри-Ланка"]),
    iso!("TD", 148, ["Chad"], ["Чад"]),
    iso!("CL", 152, ["Chile"], ["Чили"]),
    iso!("CN", 156, ["China", "People's Republic of China"], ["Китай"]),
    iso!("TW", 158, ["Taiwan"], ["Тайвань"]),
    iso!("CX", 162, ["Christmas Island"], ["Остров Рождества"]),
    iso!("CC", 166, ["Cocos (Keeling) Islands", "Cocos Islands"], ["Кокосовые острова"]),
    iso!("CO", 170, ["Colombia"], ["Колумбия"]),
    iso!("KM", 174, ["Comoros"], ["Коморы", "Коморские Острова"]),
    iso!("YT", 175, ["Mayotte"], ["Майотта"]),
    iso!("CG", 178, ["Republic of the Congo", "Congo"], ["Республика Конго", "Конго"]),
    iso!("CD", 180, ["Democratic Republic of the Congo", "Dem. Rep. Congo", "DR Congo"], ["Демократическая Республика Конго", "ДР Конго"]),
    iso!("CK", 184, ["Cook Islands", "Cook Is."], ["Острова Кука"]),
    iso!("CR", 188, ["Costa Rica"], ["Коста-Рика"]),
    iso!("HR", 191, ["Croatia"], ["Хорватия"]),
    iso!("CU", 192, ["Cuba"], ["Куба"]),
    iso!("CY", 196, ["Cyprus"], ["Кипр"]),
    iso!("CZ", 203, ["Czechia", "Czech Republic", "Czech Rep."], ["Чехия", "Чешская Республика"]),
    iso!("BJ", 204, ["Benin"], ["Бенин"]),
    iso!("DK", 208, ["Denmark"], ["Дания"]),
    iso!("DM", 212, ["Dominica"], ["Доминика"]),
    iso!("DO", 214, ["Dominican Republic", "Dominican Rep."], ["Доминиканская Республика"]),
    iso!("EC", 218, ["Ecuador"], ["Эквадор"]),
    iso!("SV", 222, ["El Salvador"], ["Сальвадор"]),
    iso!("GQ", 226, ["Equatorial Guinea", "Eq. Guinea"], ["Экваториальная Гвинея"]),
    iso!("ET", 231, ["Ethiopia"], ["Эфиопия"]),
    iso!("ER", 232, ["Eritrea"], ["Эритрея"]),
    iso!("EE", 233, ["Estonia"], ["Эстония"]),
    iso!("FO", 234, ["Faroe Islands", "Faeroe Is."], ["Фарерские острова"]),
    iso!("FK", 238, ["Falkland Islands", "Falkland Is."], ["Фолклендские острова"]),
    iso!("GS", 239, ["South Georgia and the South Sandwich Islands", "S. Geo. and the Is."], ["Южная Георгия и Южные Сандвичевы острова"]),
    iso!("FJ", 242, ["Fiji"], ["Фиджи"]),
    iso!("FI", 246, ["Finland"], ["Финляндия"]),
    iso!("AX", 248, ["Åland Islands", "Aland Islands", "Åland"], ["Аландские острова"]),
    iso!("FR", 250, ["France"], ["Франция"]),
    iso!("GF", 254, ["French Guiana"], ["Французская Гвиана"]),
    iso!("PF", 258, ["French Polynesia", "Fr. Polynesia"], ["Французская Полинезия"]),
    iso!("TF", 260, ["French Southern Territories", "Fr. S. Antarctic Lands"], ["Французские Южные и Антарктические территории"]),
    iso!("DJ", 262, ["Djibouti"], ["Джибути"]),
    iso!("GA", 266, ["Gabon"], ["Габон"]),
    iso!("GE", 268, ["Georgia"], ["Грузия"]),
    iso!("GM", 270, ["Gambia", "The Gambia"], ["Гамбия"]),
    iso!("PS", 275, ["Palestine", "State of Palestine"], ["Палестина", "Государство Палестина"]),
    iso!("DE", 276, ["Germany"], ["Германия"]),
    iso!("GH", 288, ["Ghana"], ["Гана"]),
    iso!("GI", 292, ["Gibraltar"], ["Гибралтар"]),
    iso!("KI", 296, ["Kiribati"], ["Кирибати"]),
    iso!("GR", 300, ["Greece"], ["Греция"]),
    iso!("GL", 304, ["Greenland"], ["Гренландия"]),
    iso!("GD", 308, ["Grenada"], ["Гренада"]),
    iso!("GP", 312, ["Guadeloupe"], ["Гваделупа"]),
    iso!("GU", 316, ["Guam"], ["Гуам"]),
    iso!("GT", 320, ["Guatemala"], ["Гватемала"]),
    iso!("GN", 324, ["Guinea"], ["Гвинея"]),
    iso!("GY", 328, ["Guyana"], ["Гайана"]),
    iso!("HT", 332, ["Haiti"], ["Гаити"]),
    iso!("HM", 334, ["Heard Island and McDonald Islands", "Heard I. and McDonald Is."], ["Остров Херд и острова Макдональд"]),
    iso!("VA", 336, ["Holy See", "Vatican"], ["Ватикан"]),
    iso!("HN", 340, ["Honduras"], ["Гондурас"]),
    iso!("HK", 344, ["Hong Kong"], ["Гонконг"]),
    iso!("HU", 348, ["Hungary"], ["Венгрия"]),
    iso!("IS", 352, ["Iceland"], ["Исландия"]),
    iso!("IN", 356, ["India"], ["Индия"]),
    iso!("ID", 360, ["Indonesia"], ["Индонезия"]),
    iso!("IR", 364, ["Iran", "Islamic Republic of Iran"], ["Иран"]),
    iso!("IQ", 368, ["Iraq"], ["Ирак"]),
    iso!("IE", 372, ["Ireland"], ["Ирландия"]),
    iso!("IL", 376, ["Israel"], ["Израиль"]),
    iso!("IT", 380, ["Italy"], ["Италия"]),
    iso!("CI", 384, ["Côte d'Ivoire", "Cote d'Ivoire", "Ivory Coast"], ["Кот-д'Ивуар"]),
    iso!("JM", 388, ["Jamaica"], ["Ямайка"]),
    iso!("JP", 392, ["Japan"], ["Япония"]),
    iso!("KZ", 398, ["Kazakhstan"], ["Казахстан"]),
    iso!("JO", 400, ["Jordan"], ["Иордания"]),
    iso!("KE", 404, ["Kenya"], ["Кения"]),
    iso!("KP", 408, ["North Korea", "Democratic People's Republic of Korea"], ["КНДР", "Корейская Народно-Демократическая Республика"]),
    iso!("KR", 410, ["South Korea", "Republic of Korea"], ["Республика Корея"]),
    iso!("KW", 414, ["Kuwait"], ["Кувейт"]),
    iso!("KG", 417, ["Kyrgyzstan"], ["Киргизия", "Кыргызстан"]),
    iso!("LA", 418, ["Laos", "Lao PDR", "Lao People's Democratic Republic"], ["Лаос"]),
    iso!("LB", 422, ["Lebanon"], ["Ливан"]),
    iso!("LS", 426, ["Lesotho"], ["Лесото"]),
    iso!("LV", 428, ["Latvia"], ["Латвия"]),
    iso!("LR", 430, ["Liberia"], ["Либерия"]),
    iso!("LY", 434, ["Libya"], ["Ливия"]),
    iso!("LI", 438, ["Liechtenstein"], ["Лихтенштейн"]),
    iso!("LT", 440, ["Lithuania"], ["Литва"]),
    iso!("LU", 442, ["Luxembourg"], ["Люксембург"]),
    iso!("MO", 446, ["Macao", "Macau"], ["Макао"]),
    iso!("MG", 450, ["Madagascar"], ["Мадагаскар"]),
    iso!("MW", 454, ["Malawi"], ["Малави"]),
    iso!("MY", 458, ["Malaysia"], ["Малайзия"]),
    iso!("MV", 462, ["Maldives"], ["Мальдивы"]),
    iso!("ML", 466, ["Mali"], ["Мали"]),
    iso!("MT", 470, ["Malta"], ["Мальта"]),
    iso!("MQ", 474, ["Martinique"], ["Мартиника"]),
    iso!("MR", 478, ["Mauritania"], ["Мавритания"]),
    iso!("MU", 480, ["Mauritius"], ["Маврикий"]),
    iso!("MX", 484, ["Mexico"], ["Мексика"]),
    iso!("MC", 492, ["Monaco"], ["Монако"]),
    iso!("MN", 496, ["Mongolia"], ["Монголия"]),
    iso!("MD", 498, ["Moldova", "Republic of Moldova"], ["Молдова", "Молдавия"]),
    iso!("ME", 499, ["Montenegro"], ["Черногория"]),
    iso!("MS", 500, ["Montserrat"], ["Монтсеррат"]),
    iso!("MA", 504, ["Morocco"], ["Марокко"]),
    iso!("MZ", 508, ["Mozambique"], ["Мозамбик"]),
    iso!("OM", 512, ["Oman"], ["Оман"]),
    iso!("NA", 516, ["Namibia"], ["Намибия"]),
    iso!("NR", 520, ["Nauru"], ["Науру"]),
    iso!("NP", 524, ["Nepal"], ["Непал"]),
    iso!("NL", 528, ["Netherlands", "The Netherlands"], ["Нидерланды"]),
    iso!("CW", 531, ["Curaçao", "Curacao"], ["Кюрасао"]),
    iso!("AW", 533, ["Aruba"], ["Аруба"]),
    iso!("SX", 534, ["Sint Maarten"], ["Синт-Мартен"]),
    iso!("BQ", 535, ["Bonaire, Sint Eustatius and Saba", "Caribbean Netherlands"], ["Бонайре, Синт-Эстатиус и Саба"]),
    iso!("NC", 540, ["New Caledonia"], ["Новая Каледония"]),
    iso!("VU", 548, ["Vanuatu"], ["Вануату"]),
    iso!("NZ", 554, ["New Zealand"], ["Новая Зеландия"]),
    iso!("NI", 558, ["Nicaragua"], ["Никарагуа"]),
    iso!("NE", 562, ["Niger"], ["Нигер"]),
    iso!("NG", 566, ["Nigeria"], ["Нигерия"]),
    iso!("NU", 570, ["Niue"], ["Ниуэ"]),
    iso!("NF", 574, ["Norfolk Island"], ["Остров Норфолк"]),
    iso!("NO", 578, ["Norway"], ["Норвегия"]),
    iso!("MP", 580, ["Northern Mariana Islands", "N. Mariana Is."], ["Северные Марианские острова"]),
    iso!("UM", 581, ["United States Minor Outlying Islands"], ["Внешние малые острова США"]),
    iso!("FM", 583, ["Micronesia", "Federated States of Micronesia"], ["Микронезия"]),
    iso!("MH", 584, ["Marshall Islands", "Marshall Is."], ["Маршалловы Острова"]),
    iso!("PW", 585, ["Palau"], ["Палау"]),
    iso!("PK", 586, ["Pakistan"], ["Пакистан"]),
    iso!("PA", 591, ["Panama"], ["Панама"]),
    iso!("PG", 598, ["Papua New Guinea"], ["Папуа — Новая Гвинея", "Папуа-Новая Гвинея"]),
    iso!("PY", 600, ["Paraguay"], ["Парагвай"]),
    iso!("PE", 604, ["Peru"], ["Перу"]),
    iso!("PH", 608, ["Philippines"], ["Филиппины"]),
    iso!("PN", 612, ["Pitcairn", "Pitcairn Islands", "Pitcairn Is."], ["Острова Питкэрн"]),
    iso!("PL", 616, ["Poland"], ["Польша"]),
    iso!("PT", 620, ["Portugal"], ["Португалия"]),
    iso!("GW", 624, ["Guinea-Bissau"], ["Гвинея-Бисау"]),
    iso!("TL", 626, ["Timor-Leste", "East Timor"], ["Восточный Тимор", "Тимор-Лесте"]),
    iso!("PR", 630, ["Puerto Rico"], ["Пуэрто-Рико"]),
    iso!("QA", 634, ["Qatar"], ["Катар"]),
    iso!("RE", 638, ["Réunion", "Reunion"], ["Реюньон"]),
    iso!("RO", 642, ["Romania"], ["Румыния"]),
    iso!("RU", 643, ["Russia", "Russian Federation"], ["Россия", "Российская Федерация"]),
    iso!("RW", 646, ["Rwanda"], ["Руанда"]),
    iso!("BL", 652, ["Saint Barthélemy", "St-Barthélemy"], ["Сен-Бартелеми"]),
    iso!("SH", 654, ["Saint Helena"], ["Остров Святой Елены"]),
    iso!("KN", 659, ["Saint Kitts and Nevis"], ["Сент-Китс и Невис"]),
    iso!("AI", 660, ["Anguilla"], ["Ангилья"]),
    iso!("LC", 662, ["Saint Lucia"], ["Сент-Люсия"]),
    iso!("MF", 663, ["Saint Martin", "St-Martin"], ["Сен-Мартен"]),
    iso!("PM", 666, ["Saint Pierre and Miquelon", "St. Pierre and Miquelon"], ["Сен-Пьер и Микелон"]),
    iso!("VC", 670, ["Saint Vincent and the Grenadines"], ["Сент-Винсент и Гренадины"]),
    iso!("SM", 674, ["San Marino"], ["Сан-Марино"]),
    iso!("ST", 678, ["Sao Tome and Principe"], ["Сан-Томе и Принсипи"]),
    iso!("SA", 682, ["Saudi Arabia"], ["Саудовская Аравия"]),
    iso!("SN", 686, ["Senegal"], ["Сенегал"]),
    iso!("RS", 688, ["Serbia"], ["Сербия"]),
    iso!("SC", 690, ["Seychelles"], ["Сейшельские Острова", "Сейшелы"]),
    iso!("SL", 694, ["Sierra Leone"], ["Сьерра-Леоне"]),
    iso!("SG", 702, ["Singapore"], ["Сингапур"]),
    iso!("SK", 703, ["Slovakia"], ["Словакия"]),
    iso!("VN", 704, ["Vietnam", "Viet Nam"], ["Вьетнам"]),
    iso!("SI", 705, ["Slovenia"], ["Словения"]),
    iso!("SO", 706, ["Somalia"], ["Сомали"]),
    iso!("ZA", 710, ["South Africa"], ["Южно-Африканская Республика", "ЮАР"]),
    iso!("ZW", 716, ["Zimbabwe"], ["Зимбабве"]),
    iso!("ES", 724, ["Spain"], ["Испания"]),
    iso!("SS", 728, ["South Sudan", "S. Sudan"], ["Южный Судан"]),
    iso!("SD", 729, ["Sudan"], ["Судан"]),
    iso!("EH", 732, ["Western Sahara", "W. Sahara"], ["Западная Сахара"]),
    iso!("SR", 740, ["Suriname"], ["Суринам"]),
    iso!("SJ", 744, ["Svalbard and Jan Mayen"], ["Шпицберген и Ян-Майен"]),
    iso!("SZ", 748, ["Eswatini", "Swaziland"], ["Эсватини", "Свазиленд"]),
    iso!("SE", 752, ["Sweden"], ["Швеция"]),
    iso!("CH", 756, ["Switzerland"], ["Швейцария"]),
    iso!("SY", 760, ["Syria", "Syrian Arab Republic"], ["Сирия"]),
    iso!("TJ", 762, ["Tajikistan"], ["Таджикистан"]),
    iso!("TH", 764, ["Thailand"], ["Таиланд"]),
    iso!("TG", 768, ["Togo"], ["Того"]),
    iso!("TK", 772, ["Tokelau"], ["Токелау"]),
    iso!("TO", 776, ["Tonga"], ["Тонга"]),
    iso!("TT", 780, ["Trinidad and Tobago"], ["Тринидад и Тобаго"]),
    iso!("AE", 784, ["United Arab Emirates"], ["Объединённые Арабские Эмираты"]),
    iso!("TN", 788, ["Tunisia"], ["Тунис"]),
    iso!("TR", 792, ["Turkey", "Türkiye"], ["Турция"]),
    iso!("TM", 795, ["Turkmenistan"], ["Туркмения", "Туркменистан"]),
    iso!("TC", 796, ["Turks and Caicos Islands", "Turks and Caicos Is."], ["Теркс и Кайкос"]),
    iso!("TV", 798, ["Tuvalu"], ["Тувалу"]),
    iso!("UG", 800, ["Uganda"], ["Уганда"]),
    iso!("UA", 804, ["Ukraine"], ["Украина"]),
    iso!("MK", 807, ["North Macedonia", "Macedonia"], ["Северная Македония"]),
    iso!("EG", 818, ["Egypt"], ["Египет"]),
    iso!("GB", 826, ["United Kingdom", "United Kingdom of Great Britain and Northern Ireland"], ["Великобритания", "Соединённое Королевство"]),
    iso!("GG", 831, ["Guernsey"], ["Гернси"]),
    iso!("JE", 832, ["Jersey"], ["Джерси"]),
    iso!("IM", 833, ["Isle of Man"], ["Остров Мэн"]),
    iso!("TZ", 834, ["Tanzania", "United Republic of Tanzania"], ["Танзания"]),
    iso!("US", 840, ["United States of America", "United States"], ["Соединённые Штаты Америки"]),
    iso!("VI", 850, ["United States Virgin Islands", "U.S. Virgin Is."], ["Американские Виргинские острова", "Виргинские острова (США)"]),
    iso!("BF", 854, ["Burkina Faso"], ["Буркина-Фасо"]),
    iso!("UY", 858, ["Uruguay"], ["Уругвай"]),
    iso!("UZ", 860, ["Uzbekistan"], ["Узбекистан"]),
    iso!("VE", 862, ["Venezuela"], ["Венесуэла"]),
    iso!("WF", 876, ["Wallis and Futuna", "Wallis and Futuna Is."], ["Уоллис и Футуна"]),
    iso!("WS", 882, ["Samoa"], ["Самоа"]),
    iso!("YE", 887, ["Yemen"], ["Йемен"]),
    iso!("ZM", 894, ["Zambia"], ["Замбия"]),
    // no ISO numeric code; matched to geometry by name
    iso!("XK", none, ["Kosovo"], ["Косово"]),
];

static BY_ALPHA2: LazyLock<HashMap<&'static str, &'static IsoCountry>> =
    LazyLock::new(|| COUNTRIES.iter().map(|c| (c.alpha2, c)).collect());

static BY_NUMERIC: LazyLock<HashMap<u16, &'static IsoCountry>> =
    LazyLock::new(|| COUNTRIES.iter().filter_map(|c| Some((c.numeric?, c))).collect());

// folded name -> alpha2, one table per locale
static RU_NAMES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| name_table(Locale::Ru));
static EN_NAMES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| name_table(Locale::En));

fn name_table(locale: Locale) -> HashMap<String, &'static str> {
    COUNTRIES
        .iter()
        .flat_map(|c| c.names(locale).iter().map(move |n| (fold_name(n), c.alpha2)))
        .collect()
}

pub fn by_alpha2(code: &str) -> Option<&'static IsoCountry> {
    BY_ALPHA2.get(code.to_ascii_uppercase().as_str()).copied()
}

pub fn by_numeric(id: u16) -> Option<&'static IsoCountry> {
    BY_NUMERIC.get(&id).copied()
}

pub fn alpha2_to_numeric(code: &str) -> Option<u16> {
    by_alpha2(code).and_then(|c| c.numeric)
}

/// Alpha-2 code for a name in one locale, ignoring case and typography.
pub fn alpha2_by_name(name: &str, locale: Locale) -> Option<&'static str> {
    let table = match locale {
        Locale::Ru => &*RU_NAMES,
        Locale::En => &*EN_NAMES,
    };
    table.get(&fold_name(name)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let alpha: HashSet<_> = COUNTRIES.iter().map(|c| c.alpha2).collect();
        let numeric: Vec<_> = COUNTRIES.iter().filter_map(|c| c.numeric).collect();
        let distinct: HashSet<_> = numeric.iter().collect();
        assert_eq!(alpha.len(), COUNTRIES.len());
        assert_eq!(distinct.len(), numeric.len());
    }

    #[test]
    fn names_do_not_collide_across_countries() {
        for locale in [Locale::Ru, Locale::En] {
            let total: usize = COUNTRIES.iter().map(|c| c.names(locale).len()).sum();
            assert_eq!(name_table(locale).len(), total, "duplicate name in {locale:?}");
        }
    }

    #[test]
    fn numeric_and_alpha2_agree() {
        assert_eq!(alpha2_to_numeric("cn"), Some(156));
        assert_eq!(by_numeric(112).map(|c| c.alpha2), Some("BY"));
        assert_eq!(by_numeric(999).map(|c| c.alpha2), None);
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        assert_eq!(alpha2_by_name("КИТАЙ", Locale::Ru), Some("CN"));
        assert_eq!(alpha2_by_name("dem. rep. congo", Locale::En), Some("CD"));
        assert_eq!(alpha2_by_name("Китай", Locale::En), None);
    }

    #[test]
    fn territories_and_partially_recognised_states_are_listed() {
        assert_eq!(alpha2_by_name("Гибралтар", Locale::Ru), Some("GI"));
        assert_eq!(alpha2_by_name("Кюрасао", Locale::Ru), Some("CW"));
        assert_eq!(alpha2_by_name("Curacao", Locale::En), Some("CW"));
        assert_eq!(alpha2_by_name("Бермуды", Locale::Ru), Some("BM"));
        assert_eq!(alpha2_to_numeric("BM"), Some(60));
        assert_eq!(alpha2_by_name("Косово", Locale::Ru), Some("XK"));
        assert_eq!(alpha2_by_name("Kosovo", Locale::En), Some("XK"));
        assert_eq!(alpha2_to_numeric("XK"), None);
    }
}
