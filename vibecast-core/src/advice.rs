//! Advice engine: buckets a reading into a weather group and draws outfit,
//! food, mood and warning text for it.

use rand::Rng;

use crate::model::AdviceResult;

/// Appended to every outfit drawn for the rain group.
pub const RAIN_OUTFIT_SUFFIX: &str = " (Don't be a hero.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Cold,
    Chilly,
    Mild,
    Hot,
    Rain,
}

impl Group {
    pub fn classify(temperature_c: f64, weather_code: i32) -> Self {
        if is_raining(weather_code) {
            return Self::Rain;
        }

        if temperature_c < 5.0 {
            Self::Cold
        } else if temperature_c < 15.0 {
            Self::Chilly
        } else if temperature_c < 25.0 {
            Self::Mild
        } else {
            Self::Hot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Chilly => "chilly",
            Self::Mild => "mild",
            Self::Hot => "hot",
            Self::Rain => "rain",
        }
    }

    pub const fn all() -> &'static [Group] {
        &[Group::Cold, Group::Chilly, Group::Mild, Group::Hot, Group::Rain]
    }

    fn vibes(&self) -> &'static [&'static str] {
        match self {
            Self::Cold => &[
                "Hibernation mode activated. Do not leave the blanket fort.",
                "Today feels like the world set its thermostat to 'Nope'.",
                "Your heater is your best friend. Maybe your only friend.",
                "Perfect day to write poetry about how cold your soul feels.",
            ],
            Self::Chilly => &[
                "Perfect weather for reading a book by the window dramatically.",
                "Crisp but cozy. Main character vibes.",
                "You may or may not develop a scarf addiction today.",
                "Ideal weather for long walks and existential thoughts.",
            ],
            Self::Mild => &[
                "Actually pleasant. Go touch some grass.",
                "Weather so decent it almost feels suspicious.",
                "Solid 8/10 day for living your best life.",
                "Great day for running errands you’ve been avoiding for months.",
            ],
            Self::Hot => &[
                "It's hot. Find AC or a pool immediately.",
                "Everything feels sticky. Including your soul.",
                "The sun is doing the absolute most today.",
                "Perfect day to regret wearing anything even slightly thick.",
            ],
            Self::Rain => &[
                "Wet socks tragedy waiting to happen. Stay home and cuddle.",
                "The sky is crying, and honestly same.",
                "Today’s vibe: moist disappointment.",
                "Good day to pretend you’re in a dramatic music video.",
            ],
        }
    }

    fn outfits(&self) -> &'static [&'static str] {
        match self {
            Self::Cold => &[
                "Insulated coat and scarf",
                "Thermal layers with a heavy jacket",
                "Wool gloves, hat, and thick boots",
            ],
            Self::Chilly => &[
                "Hoodie or light coat",
                "Sweater with long pants",
                "Layered shirt, hoodie, and jacket",
            ],
            Self::Mild => &[
                "Light jacket or cardigan",
                "Long-sleeve shirt with jeans",
                "Denim jacket with a simple tee",
            ],
            Self::Hot => &[
                "Shorts and a loose shirt",
                "Tank top with breathable fabrics",
                "Light cotton or linen outfit",
            ],
            Self::Rain => &[
                "Raincoat with umbrella",
                "Waterproof jacket and boots",
                "Hooded coat with quick-dry clothing",
            ],
        }
    }

    fn foods(&self) -> &'static [&'static str] {
        match self {
            Self::Cold => &[
                "Hot chocolate that warms you up like a gentle hug and gives you quick cozy energy.",
                "A hearty stew that keeps your tummy full and happy when the air feels extra cold.",
                "Curry with warm little spices that help your body feel toasty from the inside.",
                "Roast dishes that give steady comfort and help you stay warm longer.",
                "Soft, buttery pastries that feel like a tiny warm treat on a chilly day.",
            ],
            Self::Chilly => &[
                "Tomato soup that gently warms you and feels comforting in the cool air.",
                "A simple rice bowl that gives calm, steady energy without feeling heavy.",
                "Warm tea with bread that feels like a soft little comfort snack.",
                "Pasta that gives easy warmth and keeps you feeling balanced.",
            ],
            Self::Mild => &[
                "A cozy sandwich with a nice balance of flavors that fits the gentle weather.",
                "Light pasta that feels just right for mild days, not too warm and not too heavy.",
                "Warm-but-light noodle dishes that are friendly on your stomach.",
                "A tidy little lunch bowl with grains and greens that matches the calm weather.",
                "A smoothie that’s refreshing in a soft, pleasant way.",
            ],
            Self::Hot => &[
                "Fresh salads that cool you down and keep you hydrated when it’s toasty outside.",
                "Cold noodles that feel refreshing and help your body stay comfy in the heat.",
                "A sweet fruit bowl that gives hydrating, sunny energy.",
                "Iced drinks that cool you off and help you relax in hot weather.",
                "Light seafood dishes that are easy to eat and won’t make you feel overheated.",
            ],
            Self::Rain => &[
                "Warm noodle soup that feels cozy and soothing on drizzly days.",
                "Soft bread that’s gentle and comforting when the weather feels gloomy.",
                "A cup of tea that brings warm, calm feelings during rainy moments.",
                "A simple broth that warms you without feeling too heavy.",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    Rain,
    Wind,
    Cold,
    Heat,
}

impl WarningKind {
    /// Later checks override earlier ones.
    pub fn select(temperature_c: f64, weather_code: i32, wind_kph: f64) -> Option<Self> {
        let mut kind = None;

        if is_raining(weather_code) {
            kind = Some(Self::Rain);
        }
        if wind_kph > 20.0 {
            kind = Some(Self::Wind);
        }
        if temperature_c < 5.0 && is_snowing(weather_code) {
            kind = Some(Self::Cold);
        }
        if temperature_c > 28.0 {
            kind = Some(Self::Heat);
        }

        kind
    }

    pub fn bank(&self) -> &'static [&'static str] {
        match self {
            Self::Rain => &["Slippery roads!", "Umbrella discipline required."],
            Self::Wind => &["High winds! Goodbye hat.", "Wind may attempt to yeet you."],
            Self::Cold => &["Watch out for ice!", "Stay warm and don’t overdo outdoor time."],
            Self::Heat => &["Stay hydrated!", "Limit sun exposure!"],
        }
    }
}

pub fn is_raining(weather_code: i32) -> bool {
    (51..=67).contains(&weather_code)
}

pub fn is_snowing(weather_code: i32) -> bool {
    (71..=77).contains(&weather_code)
}

/// Uniform draw from a non-empty bank.
pub(crate) fn pick<R: Rng + ?Sized>(rng: &mut R, bank: &'static [&'static str]) -> &'static str {
    bank[rng.gen_range(0..bank.len())]
}

/// Draw advice for the given conditions. Vibe, outfit and food are drawn
/// independently of each other.
pub fn advise<R: Rng + ?Sized>(
    temperature_c: f64,
    weather_code: i32,
    wind_kph: f64,
    rng: &mut R,
) -> AdviceResult {
    let group = Group::classify(temperature_c, weather_code);

    let mut outfit = pick(rng, group.outfits()).to_string();
    if group == Group::Rain {
        outfit.push_str(RAIN_OUTFIT_SUFFIX);
    }

    let vibe = pick(rng, group.vibes()).to_string();
    let food = pick(rng, group.foods()).to_string();

    let warning = WarningKind::select(temperature_c, weather_code, wind_kph)
        .map(|kind| pick(rng, kind.bank()).to_string());

    tracing::debug!(group = group.as_str(), has_warning = warning.is_some(), "advice drawn");

    AdviceResult { outfit, vibe, food, warning }
}
