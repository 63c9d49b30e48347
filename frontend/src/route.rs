use shared::CandidateId;
use shared::session::Area;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CandidateLogin,
    CandidateSignup,
    CandidateDashboard,
    CandidateDetails,
    HrLogin,
    HrHome,
    HrDashboard,
    HrCandidate(CandidateId),
    HrUploadVideo(CandidateId),
    HrScheduleMeeting(CandidateId),
    HrAnalytics,
    HrCandidateAnalytics(CandidateId),
}

fn parse_id(raw: &str) -> Option<CandidateId> {
    raw.parse().ok()
}

impl Route {
    /// Unknown paths resolve to `None`; the app sends those to the
    /// candidate login.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["candidate-login"] => Some(Route::CandidateLogin),
            ["candidate-signup"] => Some(Route::CandidateSignup),
            ["candidate-dashboard"] => Some(Route::CandidateDashboard),
            ["candidate-details"] => Some(Route::CandidateDetails),
            ["hr-login"] => Some(Route::HrLogin),
            ["hr-home"] => Some(Route::HrHome),
            ["hr-dashboard"] => Some(Route::HrDashboard),
            ["hr", "candidate", raw] => parse_id(raw).map(Route::HrCandidate),
            ["hr", "upload-video", raw] => parse_id(raw).map(Route::HrUploadVideo),
            ["hr", "schedule-meeting", raw] => parse_id(raw).map(Route::HrScheduleMeeting),
            ["hr", "analytics"] => Some(Route::HrAnalytics),
            ["hr", "analytics", raw] => parse_id(raw).map(Route::HrCandidateAnalytics),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::CandidateLogin => "/candidate-login".to_string(),
            Route::CandidateSignup => "/candidate-signup".to_string(),
            Route::CandidateDashboard => "/candidate-dashboard".to_string(),
            Route::CandidateDetails => "/candidate-details".to_string(),
            Route::HrLogin => "/hr-login".to_string(),
            Route::HrHome => "/hr-home".to_string(),
            Route::HrDashboard => "/hr-dashboard".to_string(),
            Route::HrCandidate(id) => format!("/hr/candidate/{}", id),
            Route::HrUploadVideo(id) => format!("/hr/upload-video/{}", id),
            Route::HrScheduleMeeting(id) => format!("/hr/schedule-meeting/{}", id),
            Route::HrAnalytics => "/hr/analytics".to_string(),
            Route::HrCandidateAnalytics(id) => format!("/hr/analytics/{}", id),
        }
    }

    pub fn area(&self) -> Option<Area> {
        match self {
            Route::CandidateLogin | Route::CandidateSignup | Route::HrLogin => None,
            Route::CandidateDashboard | Route::CandidateDetails => Some(Area::Candidate),
            _ => Some(Area::Hr),
        }
    }

    /// Protected routes without a matching identity go to that area's login.
    pub fn guarded(self, has_identity: impl Fn(Area) -> bool) -> Route {
        match self.area() {
            Some(area) if !has_identity(area) => match area {
                Area::Candidate => Route::CandidateLogin,
                Area::Hr => Route::HrLogin,
            },
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_survive_parsing() {
        let routes = [
            Route::CandidateSignup,
            Route::CandidateDetails,
            Route::HrHome,
            Route::HrCandidate(CandidateId(12)),
            Route::HrScheduleMeeting(CandidateId(3)),
            Route::HrCandidateAnalytics(CandidateId(9)),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn root_is_candidate_login_and_junk_is_unknown() {
        assert_eq!(Route::parse("/"), Some(Route::CandidateLogin));
        assert_eq!(Route::parse("/hr/candidate/abc"), None);
        assert_eq!(Route::parse("/nowhere"), None);
        assert_eq!(
            Route::parse("/hr/candidate/5?tab=history"),
            Some(Route::HrCandidate(CandidateId(5)))
        );
    }

    #[test]
    fn gates_send_each_area_to_its_own_login() {
        let nobody = |_: Area| false;
        assert_eq!(Route::CandidateDashboard.guarded(nobody), Route::CandidateLogin);
        assert_eq!(Route::HrAnalytics.guarded(nobody), Route::HrLogin);
        assert_eq!(Route::CandidateSignup.guarded(nobody), Route::CandidateSignup);

        let hr_only = |area: Area| area == Area::Hr;
        assert_eq!(Route::HrDashboard.guarded(hr_only), Route::HrDashboard);
        assert_eq!(Route::CandidateDetails.guarded(hr_only), Route::CandidateLogin);
    }
}
