use serde::{Deserialize, Serialize};

/// Raw consultation form state as edited by the user.
///
/// Every field is kept in its input representation (strings and keyword lists) so
/// partially filled or invalid values survive until a step is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsultationFormData {
    pub my_gender: String,
    pub my_age: String,
    #[serde(rename = "myMBTI")]
    pub my_mbti: String,
    pub my_personality_preset: Vec<String>,
    pub my_personality_custom: String,
    pub my_religion: String,

    pub partner_gender: String,
    pub partner_age: String,
    #[serde(rename = "partnerMBTI")]
    pub partner_mbti: String,
    pub partner_personality_preset: Vec<String>,
    pub partner_personality_custom: String,
    pub partner_religion: String,

    pub relationship_duration: String,
    pub breakup_date: String,
    pub breakup_reason: String,
    pub breakup_reason_detail: String,
    pub current_contact: String,
    pub distance: String,
    pub partner_career: String,
    pub additional_info: String,
}

impl ConsultationFormData {
    /// Mutable handle on a free-text or code field; `None` for keyword lists.
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        let slot = match field {
            FormField::MyGender => &mut self.my_gender,
            FormField::MyAge => &mut self.my_age,
            FormField::MyMbti => &mut self.my_mbti,
            FormField::MyPersonalityCustom => &mut self.my_personality_custom,
            FormField::MyReligion => &mut self.my_religion,
            FormField::PartnerGender => &mut self.partner_gender,
            FormField::PartnerAge => &mut self.partner_age,
            FormField::PartnerMbti => &mut self.partner_mbti,
            FormField::PartnerPersonalityCustom => &mut self.partner_personality_custom,
            FormField::PartnerReligion => &mut self.partner_religion,
            FormField::RelationshipDuration => &mut self.relationship_duration,
            FormField::BreakupDate => &mut self.breakup_date,
            FormField::BreakupReason => &mut self.breakup_reason,
            FormField::BreakupReasonDetail => &mut self.breakup_reason_detail,
            FormField::CurrentContact => &mut self.current_contact,
            FormField::Distance => &mut self.distance,
            FormField::PartnerCareer => &mut self.partner_career,
            FormField::AdditionalInfo => &mut self.additional_info,
            FormField::MyPersonalityPreset | FormField::PartnerPersonalityPreset => return None,
        };
        Some(slot)
    }

    pub fn keywords_mut(&mut self, party: Party) -> &mut Vec<String> {
        match party {
            Party::Me => &mut self.my_personality_preset,
            Party::Partner => &mut self.partner_personality_preset,
        }
    }
}

/// Which side of the former couple a field describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Me,
    Partner,
}

/// Addressable fields of [`ConsultationFormData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    #[serde(rename = "myGender")]
    MyGender,
    #[serde(rename = "myAge")]
    MyAge,
    #[serde(rename = "myMBTI")]
    MyMbti,
    #[serde(rename = "myPersonalityPreset")]
    MyPersonalityPreset,
    #[serde(rename = "myPersonalityCustom")]
    MyPersonalityCustom,
    #[serde(rename = "myReligion")]
    MyReligion,
    #[serde(rename = "partnerGender")]
    PartnerGender,
    #[serde(rename = "partnerAge")]
    PartnerAge,
    #[serde(rename = "partnerMBTI")]
    PartnerMbti,
    #[serde(rename = "partnerPersonalityPreset")]
    PartnerPersonalityPreset,
    #[serde(rename = "partnerPersonalityCustom")]
    PartnerPersonalityCustom,
    #[serde(rename = "partnerReligion")]
    PartnerReligion,
    #[serde(rename = "relationshipDuration")]
    RelationshipDuration,
    #[serde(rename = "breakupDate")]
    BreakupDate,
    #[serde(rename = "breakupReason")]
    BreakupReason,
    #[serde(rename = "breakupReasonDetail")]
    BreakupReasonDetail,
    #[serde(rename = "currentContact")]
    CurrentContact,
    #[serde(rename = "distance")]
    Distance,
    #[serde(rename = "partnerCareer")]
    PartnerCareer,
    #[serde(rename = "additionalInfo")]
    AdditionalInfo,
}

impl FormField {
    pub const fn key(self) -> &'static str {
        match self {
            FormField::MyGender => "myGender",
            FormField::MyAge => "myAge",
            FormField::MyMbti => "myMBTI",
            FormField::MyPersonalityPreset => "myPersonalityPreset",
            FormField::MyPersonalityCustom => "myPersonalityCustom",
            FormField::MyReligion => "myReligion",
            FormField::PartnerGender => "partnerGender",
            FormField::PartnerAge => "partnerAge",
            FormField::PartnerMbti => "partnerMBTI",
            FormField::PartnerPersonalityPreset => "partnerPersonalityPreset",
            FormField::PartnerPersonalityCustom => "partnerPersonalityCustom",
            FormField::PartnerReligion => "partnerReligion",
            FormField::RelationshipDuration => "relationshipDuration",
            FormField::BreakupDate => "breakupDate",
            FormField::BreakupReason => "breakupReason",
            FormField::BreakupReasonDetail => "breakupReasonDetail",
            FormField::CurrentContact => "currentContact",
            FormField::Distance => "distance",
            FormField::PartnerCareer => "partnerCareer",
            FormField::AdditionalInfo => "additionalInfo",
        }
    }

    /// The wizard step whose validation owns this field.
    pub fn step(self) -> FormStep {
        match self {
            FormField::MyGender
            | FormField::MyAge
            | FormField::PartnerGender
            | FormField::PartnerAge => FormStep::Basics,
            FormField::MyMbti
            | FormField::MyPersonalityPreset
            | FormField::MyPersonalityCustom
            | FormField::MyReligion
            | FormField::PartnerMbti
            | FormField::PartnerPersonalityPreset
            | FormField::PartnerPersonalityCustom
            | FormField::PartnerReligion => FormStep::Personality,
            FormField::RelationshipDuration
            | FormField::BreakupDate
            | FormField::Distance
            | FormField::CurrentContact
            | FormField::PartnerCareer => FormStep::Relationship,
            FormField::BreakupReason
            | FormField::BreakupReasonDetail
            | FormField::AdditionalInfo => FormStep::Breakup,
        }
    }
}

/// The four pages of the consultation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Basics,
    Personality,
    Relationship,
    Breakup,
}

impl FormStep {
    pub const COUNT: u8 = 4;

    pub const ALL: [FormStep; 4] = [
        FormStep::Basics,
        FormStep::Personality,
        FormStep::Relationship,
        FormStep::Breakup,
    ];

    pub const fn number(self) -> u8 {
        match self {
            FormStep::Basics => 1,
            FormStep::Personality => 2,
            FormStep::Relationship => 3,
            FormStep::Breakup => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub const fn title(self) -> &'static str {
        match self {
            FormStep::Basics => "기본 정보",
            FormStep::Personality => "성격 및 가치관",
            FormStep::Relationship => "관계 정보",
            FormStep::Breakup => "이별 사유",
        }
    }

    pub const fn fields(self) -> &'static [FormField] {
        match self {
            FormStep::Basics => &[
                FormField::MyGender,
                FormField::MyAge,
                FormField::PartnerGender,
                FormField::PartnerAge,
            ],
            FormStep::Personality => &[
                FormField::MyMbti,
                FormField::MyPersonalityPreset,
                FormField::MyPersonalityCustom,
                FormField::MyReligion,
                FormField::PartnerMbti,
                FormField::PartnerPersonalityPreset,
                FormField::PartnerPersonalityCustom,
                FormField::PartnerReligion,
            ],
            FormStep::Relationship => &[
                FormField::RelationshipDuration,
                FormField::BreakupDate,
                FormField::Distance,
                FormField::CurrentContact,
                FormField::PartnerCareer,
            ],
            FormStep::Breakup => &[
                FormField::BreakupReason,
                FormField::BreakupReasonDetail,
                FormField::AdditionalInfo,
            ],
        }
    }
}

/// Keywords offered as personality presets.
pub const PERSONALITY_KEYWORDS: [&str; 12] = [
    "직설적",
    "회피형",
    "불안형",
    "안정형",
    "예민함",
    "무던함",
    "소극적",
    "적극적",
    "내향",
    "외향",
    "신중함",
    "즉흥적",
];

/// Generates a closed option set with its wire code and Korean display label.
macro_rules! option_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($code:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|option| option.code() == code)
            }
        }
    };
}

option_set!(
    /// Self-reported gender.
    Gender {
        Male => ("male", "남성"),
        Female => ("female", "여성"),
    }
);

option_set!(
    /// How long the relationship lasted.
    RelationshipDuration {
        LessThanSixMonths => ("less-than-6m", "6개월 미만"),
        SixMonthsToYear => ("6m-1y", "6개월~1년"),
        OneToThreeYears => ("1y-3y", "1년~3년"),
        ThreeToFiveYears => ("3y-5y", "3년~5년"),
        MoreThanFiveYears => ("more-than-5y", "5년 이상"),
    }
);

option_set!(
    /// Current living distance between the two people.
    Distance {
        SameArea => ("same-area", "같은 동네"),
        SameCity => ("same-city", "같은 도시"),
        NearbyCity => ("nearby-city", "인근 도시"),
        Far => ("far", "먼 거리"),
        DifferentCountry => ("different-country", "다른 나라"),
    }
);

option_set!(
    /// Contact status since the breakup.
    ContactStatus {
        Blocked => ("blocked", "차단 상태"),
        NoContact => ("no-contact", "완전 단절"),
        Occasional => ("occasional", "가끔 연락"),
        Friends => ("friends", "친구로 지냄"),
        Regular => ("regular", "자주 연락"),
    }
);

option_set!(
    /// Primary reason for the breakup.
    BreakupReason {
        Personality => ("personality", "성격 차이"),
        Distance => ("distance", "장거리 연애"),
        Family => ("family", "가족 반대"),
        Career => ("career", "진로/취업 문제"),
        Values => ("values", "가치관 차이"),
        Communication => ("communication", "소통 부족"),
        Trust => ("trust", "신뢰 문제"),
        ThirdParty => ("third-party", "제3자 개입"),
        Marriage => ("marriage", "결혼 의지/시기 불일치"),
        Other => ("other", "기타"),
    }
);

option_set!(
    Religion {
        Irreligious => ("none", "무교"),
        Christian => ("christian", "기독교"),
        Catholic => ("catholic", "천주교"),
        Buddhist => ("buddhist", "불교"),
        Other => ("other", "기타"),
    }
);

impl RelationshipDuration {
    /// Whether the bucket reaches into year-long territory.
    pub fn spans_year(self) -> bool {
        self.code().contains('y')
    }
}

impl ContactStatus {
    pub fn keeps_in_touch(self) -> bool {
        matches!(self, ContactStatus::Regular | ContactStatus::Friends)
    }
}
